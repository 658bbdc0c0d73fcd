use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{connect_state, output_success};
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a bearer token acting as a dealership")]
    Issue {
        #[arg(help = "Dealership ID")]
        dealership_id: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { dealership_id } => {
            let state = connect_state(config::config()).await?;
            let token = state.auth.issue_token(&dealership_id).await?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token issued",
                    Some(json!({ "dealership_id": dealership_id, "token": token })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
