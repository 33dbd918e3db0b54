use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jotter::auth::token::{generate_secret, TokenKeys};
use jotter::config::{Cli, Config};
use jotter::state::AppState;
use jotter::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli)?;
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Ensure uploads directory exists
    std::fs::create_dir_all(config.uploads_path())?;

    // Initialize database
    let pool = db::create_pool(&config.db_path())?;
    db::init_schema(&pool)?;

    let secret = match config.auth.jwt_secret.clone() {
        Some(secret) => secret,
        None => {
            tracing::warn!("No auth.jwt_secret configured; tokens will not survive a restart");
            generate_secret()
        }
    };
    let keys = TokenKeys::from_secret(secret.as_bytes());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = routes::app(AppState::new(pool, config, keys));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
