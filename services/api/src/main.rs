use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use api::{config::ServerConfig, routes, state::AppState};
use common::database::Database;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting song request API service");

    let server_config = ServerConfig::from_env()?;

    // A missing connection string is not fatal: data endpoints answer 503
    let db = Database::from_env();

    // Cold start: connect and create the schema now rather than on the first request
    if db.is_configured() {
        match db.pool().await {
            Ok(_) => info!("Database connection successful"),
            Err(e) => error!("Database initialization failed, will retry on first request: {}", e),
        }
    }

    let app = routes::create_router(AppState::new(db));

    let listener = TcpListener::bind(server_config.address()).await?;
    info!("API service listening on {}", server_config.address());

    axum::serve(listener, app).await?;

    Ok(())
}
