//! Runs the recursive dealership queries against a real database.
//! Skipped unless `TEST_DATABASE_URL` points at a disposable Postgres.

use std::collections::HashSet;

use anyhow::Result;
use dms_api_rust::config::DatabaseConfig;
use dms_api_rust::database::models::{DealershipUpdate, NewDealership};
use dms_api_rust::database::{schema, DatabaseManager, DealershipStore, PgDealershipStore};

async fn store() -> Result<Option<PgDealershipStore>> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return Ok(None);
    };
    let pool = DatabaseManager::connect(&DatabaseConfig {
        url: Some(url),
        max_connections: 2,
        connection_timeout: 5,
    })
    .await?;
    schema::ensure_schema(&pool).await?;
    Ok(Some(PgDealershipStore::new(pool)))
}

async fn add(store: &PgDealershipStore, name: &str, parent: Option<&str>) -> Result<String> {
    let created = store
        .create(NewDealership {
            name: name.to_string(),
            address: "1 Main St".to_string(),
            parent_dealership_id: parent.map(str::to_string),
        })
        .await?;
    Ok(created.dealership_id)
}

#[tokio::test]
async fn recursive_walks_cover_deep_chains() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };

    let root = add(&store, "pg-root", None).await?;
    let mut ids = vec![root.clone()];
    for i in 0..80 {
        let parent = ids[ids.len() - 1].clone();
        ids.push(add(&store, &format!("pg-level-{}", i), Some(&parent)).await?);
    }
    let leaf = ids[ids.len() - 1].clone();

    let chain: Vec<String> = store
        .get_ancestor_chain(&leaf)
        .await?
        .into_iter()
        .map(|d| d.dealership_id)
        .collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(chain, expected);

    let below = store.get_descendant_ids(&root).await?;
    assert_eq!(below, ids.iter().cloned().collect::<HashSet<_>>());
    assert!(store.get_descendant_ids("pg-missing").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn recursive_walks_terminate_on_cycles() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };

    let a = add(&store, "pg-cycle-a", None).await?;
    let b = add(&store, "pg-cycle-b", Some(&a)).await?;
    store
        .update(
            &a,
            DealershipUpdate {
                name: "pg-cycle-a".to_string(),
                address: "1 Main St".to_string(),
                parent_dealership_id: Some(b.clone()),
            },
        )
        .await?;

    assert_eq!(store.get_ancestor_chain(&a).await?.len(), 2);
    assert_eq!(store.get_descendant_ids(&a).await?, HashSet::from([a, b]));
    Ok(())
}
