//! relayd - minimal chat relay daemon.

use relayd::config::Config;
use relayd::liveness::spawn_liveness_task;
use relayd::network::Gateway;
use relayd::state::Matrix;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path).map_err(|e| {
            error!(path = %config_path, error = %e, "Failed to load config");
            e
        })?
    } else {
        info!(path = %config_path, "Config file not found, using defaults");
        Config::default()
    };

    info!(
        server = %config.server.name,
        addr = %config.listen.address,
        "Starting relayd"
    );

    let matrix = Arc::new(Matrix::new(&config));
    let _liveness = spawn_liveness_task(Arc::clone(&matrix));

    let gateway = Gateway::bind(&config.listen, matrix).await?;
    gateway.run().await
}
