//! # Proposer-Watch Runtime
//!
//! Wiring for the `proposer-watch` binary.
//!
//! ## Startup Sequence
//!
//! 1. Parse flags, initialise logging
//! 2. Layer configuration: defaults, TOML file, `PW_*` environment, flags
//! 3. Load the validator directory (optional)
//! 4. Start the sync loop and the event summary task
//! 5. Run until Ctrl+C, then stop both tasks

pub mod cli;
pub mod config;
pub mod runtime;

pub use cli::Args;
pub use config::{load_config, FileConfig, RuntimeConfig};
pub use runtime::MonitorRuntime;
