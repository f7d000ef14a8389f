//! # PW-02 Block Sync
//!
//! Follows a remote chain node over HTTP and keeps a bounded, accurate view
//! of recent block production.
//!
//! **Subsystem ID:** 02  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Poll Cycle
//!
//! | Gap to tip | Action |
//! |------------|--------|
//! | nothing processed | take the tip only |
//! | 0 | nothing |
//! | 1 | take the next block |
//! | 2 ..= `max_backfill_gap` | fetch each missing height (paced), then the tip |
//! | larger | take the tip, record the skipped range |
//! | negative | ignore (lagging node) |
//!
//! A failed tip fetch leaves the state untouched; the next tick retries.
//! A failed backfill height is recorded as skipped and never retried.
//!
//! ## Module Structure
//!
//! ```text
//! pw-02-block-sync/
//! ├── domain/          # BlockRecord, SyncState, ValidatorDirectory, errors, invariants
//! ├── algorithms/      # Gap classification, block processing, stats projection
//! ├── ports/           # BlockMonitorApi (inbound) + ChainQuery, SyncEventSink (outbound)
//! ├── adapters/        # HttpChainClient, TracingEventSink, ChannelEventSink
//! ├── application/     # BlockSyncService running the poll loop
//! └── config.rs        # SyncConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod proptest;

// Re-exports
pub use adapters::{extract_block, ChannelEventSink, HttpChainClient, TracingEventSink};
pub use algorithms::{
    backfill_heights, classify_gap, project_stats, render_producer_address, BlockProcessor,
    ProcessorSettings,
};
pub use application::BlockSyncService;
pub use config::{ConfigError, SyncConfig};
pub use domain::{
    check_state, truncate_identity, BlockRecord, BoundedLog, CycleReport, DirectoryEntry,
    DirectoryError, GapDecision, Height, PollOutcome, RawBlock, SkipReason, SkippedRange,
    StatsSnapshot, SyncError, SyncEvent, SyncSnapshot, SyncState, ValidatorDirectory,
    DEFAULT_BACKFILL_DELAY_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WINDOW_CAPACITY,
    MAX_BACKFILL_GAP,
};
pub use ports::{BlockMonitorApi, ChainQuery, MockChain, RecordingSink, SyncEventSink};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
