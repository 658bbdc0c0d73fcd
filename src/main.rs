use anyhow::Context;
use tracing_subscriber::EnvFilter;

use dms_api_rust::config::{self, Environment};
use dms_api_rust::database::{schema, DatabaseManager, MemoryStore};
use dms_api_rust::state::{AppState, Stores};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    tracing::info!(
        "Starting {} API in {:?} mode",
        config.logging.service_name,
        config.environment
    );

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let stores = match &config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            schema::ensure_schema(&pool).await.context("failed to apply schema")?;
            Stores::postgres(pool)
        }
        None => {
            if config.environment == Environment::Production {
                anyhow::bail!("DATABASE_URL must be set in production");
            }
            tracing::warn!("DATABASE_URL not set; using in-memory stores, data will not survive a restart");
            Stores::memory(MemoryStore::new())
        }
    };

    let state = AppState::new(stores, config);
    let app = dms_api_rust::app(state, &config.security);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("{} server listening on http://{}", config.logging.service_name, bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
