//! # PW Telemetry
//!
//! Logging setup shared by every Proposer-Watch crate.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pw_telemetry::{init_tracing, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_tracing(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PW_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `PW_JSON_LOGS` | `false` | JSON line output |
//! | `PW_SERVICE_NAME` | `proposer-watch` | Service name |

#![warn(missing_docs)]

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The filter directive did not parse.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}
