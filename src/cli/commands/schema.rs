use clap::Subcommand;

use crate::cli::utils::{connect_pool, output_success};
use crate::cli::OutputFormat;
use crate::config;
use crate::database::{schema, DatabaseManager};

#[derive(Subcommand)]
pub enum SchemaCommands {
    #[command(about = "Create tables and indexes if they do not exist")]
    Init,
}

pub async fn handle(cmd: SchemaCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SchemaCommands::Init => {
            let pool = connect_pool(config::config()).await?;
            schema::ensure_schema(&pool).await?;
            DatabaseManager::close(&pool).await;

            output_success(&output_format, "Schema is up to date", None)
        }
    }
}
