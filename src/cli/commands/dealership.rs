use clap::Subcommand;
use serde_json::json;
use std::collections::{HashMap, HashSet};

use crate::cli::utils::{connect_state, output_success, print_json};
use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::{Dealership, DealershipNode, NewDealership};
use crate::database::DealershipStore;

#[derive(Subcommand)]
pub enum DealershipCommands {
    #[command(about = "Create a dealership; without --parent it becomes a new root")]
    Create {
        #[arg(long, help = "Display name")]
        name: String,

        #[arg(long, help = "Street address")]
        address: String,

        #[arg(long, help = "Parent dealership ID")]
        parent: Option<String>,
    },

    #[command(about = "Show a single dealership")]
    Show {
        #[arg(help = "Dealership ID")]
        id: String,
    },

    #[command(about = "Print the subtree rooted at a dealership")]
    Tree {
        #[arg(help = "Dealership ID")]
        id: String,
    },
}

pub async fn handle(cmd: DealershipCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let state = connect_state(config::config()).await?;

    match cmd {
        DealershipCommands::Create { name, address, parent } => {
            let created = state
                .dealerships
                .create_unscoped(NewDealership {
                    name,
                    address,
                    parent_dealership_id: parent,
                })
                .await?;

            output_success(
                &output_format,
                &format!("Created dealership {} ({})", created.name, created.dealership_id),
                Some(json!({ "dealership": created })),
            )
        }
        DealershipCommands::Show { id } => {
            let dealership = state
                .stores
                .dealerships
                .get_by_id(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("dealership '{}' not found", id))?;

            let path = state.dealerships.ancestry(&id).await;

            match output_format {
                OutputFormat::Json => print_json(&json!({ "dealership": dealership, "path": path })),
                OutputFormat::Text => {
                    println!("ID:       {}", dealership.dealership_id);
                    println!("Name:     {}", dealership.name);
                    println!("Address:  {}", dealership.address);
                    if dealership.is_root() {
                        println!("Parent:   (root)");
                    } else {
                        println!("Parent:   {}", dealership.parent_dealership_id.as_deref().unwrap_or_default());
                    }
                    println!("Path:     {}", render_path(&path));
                    println!("Created:  {}", dealership.created_at.format("%Y-%m-%d %H:%M"));
                    Ok(())
                }
            }
        }
        DealershipCommands::Tree { id } => {
            let nodes = state.dealerships.subtree(&id).await?;
            if nodes.is_empty() {
                anyhow::bail!("dealership '{}' not found", id);
            }

            match output_format {
                OutputFormat::Json => print_json(&json!({ "dealerships": nodes })),
                OutputFormat::Text => {
                    for line in render_tree(&id, &nodes) {
                        println!("{}", line);
                    }
                    Ok(())
                }
            }
        }
    }
}

fn render_path(path: &[Dealership]) -> String {
    path.iter().map(|d| d.name.as_str()).collect::<Vec<_>>().join(" > ")
}

/// Indented outline of the subtree, children sorted by name.
fn render_tree(root_id: &str, nodes: &[DealershipNode]) -> Vec<String> {
    let by_id: HashMap<&str, &DealershipNode> = nodes
        .iter()
        .map(|node| (node.dealership.dealership_id.as_str(), node))
        .collect();

    let mut lines = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![(root_id, 0usize)];

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = by_id.get(id) else { continue };
        if !seen.insert(id) {
            continue;
        }

        lines.push(format!(
            "{}{} ({})",
            "  ".repeat(depth),
            node.dealership.name,
            node.dealership.dealership_id
        ));

        let mut children: Vec<_> = node.sub_dealerships.iter().collect();
        children.sort_by(|a, b| b.name.cmp(&a.name));
        stack.extend(children.into_iter().map(|c| (c.dealership_id.as_str(), depth + 1)));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dealership(id: &str, name: &str, parent: Option<&str>) -> Dealership {
        let now = Utc::now();
        Dealership {
            dealership_id: id.to_string(),
            name: name.to_string(),
            address: "1 Main St".to_string(),
            parent_dealership_id: parent.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn renders_children_indented_under_their_parent() {
        let root = dealership("r", "Root", None);
        let north = dealership("n", "North", Some("r"));
        let east = dealership("e", "East", Some("r"));
        let shop = dealership("s", "Shop", Some("n"));

        let nodes = vec![
            DealershipNode {
                dealership: root,
                sub_dealerships: vec![north.clone(), east.clone()],
            },
            DealershipNode {
                dealership: north,
                sub_dealerships: vec![shop.clone()],
            },
            DealershipNode {
                dealership: east,
                sub_dealerships: vec![],
            },
            DealershipNode {
                dealership: shop,
                sub_dealerships: vec![],
            },
        ];

        assert_eq!(
            render_tree("r", &nodes),
            vec!["Root (r)", "  East (e)", "  North (n)", "    Shop (s)"]
        );
    }

    #[test]
    fn path_joins_names_from_the_root() {
        let path = vec![
            dealership("r", "Root", None),
            dealership("n", "North", Some("r")),
            dealership("s", "Shop", Some("n")),
        ];
        assert_eq!(render_path(&path), "Root > North > Shop");
    }
}
