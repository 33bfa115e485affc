//! Focus Analyzer - Main Entry Point

use std::path::PathBuf;

use analyzer::{analyze, init_logging, write_report, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load()?;

    // A positional argument overrides the configured recording
    if let Some(input) = std::env::args().nth(1) {
        settings.input = Some(PathBuf::from(input));
    }

    init_logging(&settings.log_level, settings.log_format)?;

    info!("=== Focus Analyzer v{} ===", env!("CARGO_PKG_VERSION"));

    let report = analyze(&settings).await?;
    write_report(&report, &settings).await?;

    Ok(())
}
