//! Attention Monitor - Main Entry Point
//!
//! Usage: `attention-monitor [CONFIG_FILE]`

use app::{init_logging, run, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let config = AppConfig::load(config_path.as_deref())?;
    init_logging(config.log_format)?;

    info!("=== Attention Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    run(config).await
}
