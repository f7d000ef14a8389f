//! # Proposer-Watch
//!
//! Follows a chain node over HTTP and reports which validator produced each
//! block, plus the tracked validator's share.
//!
//! ## Usage
//!
//! ```bash
//! proposer-watch --api-url https://rpc.example.org \
//!     --validators validators.toml --target A1B2C3D4E5F60718293A4B5C6D7E8F9001122334
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use pw_02_block_sync::{HttpChainClient, ValidatorDirectory};
use pw_runtime::{load_config, Args, MonitorRuntime};
use pw_telemetry::{init_tracing, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &args.log_level {
        telemetry = telemetry.with_level(level.clone());
    }
    if args.json_logs {
        telemetry.json_logs = true;
    }
    init_tracing(&telemetry).context("Failed to initialise logging")?;

    let config = load_config(&args, |key| std::env::var(key).ok())?;

    info!("===========================================");
    info!("  Proposer-Watch v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let directory = match &config.validators {
        Some(path) => ValidatorDirectory::load(path)
            .with_context(|| format!("Failed to load validators from {}", path.display()))?,
        None => {
            warn!("No validator directory configured, producers shown as truncated identities");
            ValidatorDirectory::empty()
        }
    };

    match &config.sync.target_producer {
        Some(target) => info!("Tracking producer: {}", directory.display_name(target)),
        None => info!("No target producer configured, share stays at 0%"),
    }

    let chain = Arc::new(HttpChainClient::new(&config.sync).context("Failed to create chain client")?);
    let mut runtime = MonitorRuntime::new(config.sync, chain, Arc::new(directory));
    runtime.start();

    info!("Monitoring. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    Ok(())
}
