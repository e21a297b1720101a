//! Entry point for the restoa-server binary.

use restoa_server::{config::ServerConfig, run_server};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::info!("Starting restoa-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Configuration: data_dir={}, addr={}, log_level={}",
        config.data_dir.display(),
        config.socket_addr(),
        config.log_level
    );
    tracing::warn!("No security features, only use for localhost");

    run_server(config).await
}

/// Initialize the tracing subscriber.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
