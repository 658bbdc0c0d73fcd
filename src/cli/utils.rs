use anyhow::Context;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::state::{AppState, Stores};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            print_json(&response)
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            Ok(())
        }
    }
}

pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The CLI always talks to Postgres; an in-memory store would vanish with the process.
pub async fn connect_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    if config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL must be set to use the dms CLI");
    }
    DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")
}

pub async fn connect_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = connect_pool(config).await?;
    Ok(AppState::new(Stores::postgres(pool), config))
}
