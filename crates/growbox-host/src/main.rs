//! # Growbox
//!
//! Runs a headless growbox session and prints the final snapshot as JSON.
//!
//! Usage: `growbox [config.toml]`

use anyhow::{Context, Result};
use growbox_host::HostConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("growbox=info".parse()?))
        .init();

    info!("Growbox host starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = HostConfig::load_or_default(path.as_deref()).with_context(|| match &path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to build default config".to_string(),
    })?;

    let snapshot = growbox_host::run(config)?;
    println!("{}", snapshot.to_json_pretty()?);

    info!("Growbox host shutdown complete");
    Ok(())
}
