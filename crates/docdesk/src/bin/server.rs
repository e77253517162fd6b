//! Document desk server binary
//!
//! Run with: cargo run -p docdesk --bin docdesk-server
//! Set `DOCDESK_CONFIG` to a TOML file to override the defaults.

use docdesk::{config::DeskConfig, server::DeskServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docdesk=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DeskConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Upload directory: {}", config.storage.upload_dir.display());
    tracing::info!(
        "  - Allowed extensions: {}",
        config.storage.allowed_extensions.join(", ")
    );
    tracing::info!("  - Merge output: {}", config.merge.default_format);

    let server = DeskServer::new(config)?;
    tracing::info!("Health: http://{}/health", server.address());
    tracing::info!("API info: http://{}/api/info", server.address());

    server.start().await?;

    Ok(())
}
