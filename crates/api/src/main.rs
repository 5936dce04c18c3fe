//! Diabetes Screening Server - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Diabetes Screening v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Classifier artifact: {}", config.model.path);

    if let Err(e) = run_server(config).await {
        error!("Fatal: {:#}", e);
        return Err(e);
    }

    Ok(())
}
