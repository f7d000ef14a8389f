//! # Block Sync Configuration
//!
//! Configuration for the Block Sync service.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::{
    DEFAULT_BACKFILL_DELAY_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SKIPPED_CAPACITY,
    DEFAULT_WINDOW_CAPACITY, MAX_BACKFILL_GAP,
};

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// TOML did not parse.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A field is out of range.
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// Why
        reason: String,
    },
}

/// Block sync configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Base URL of the chain API. Defaults to a node's RPC port, which
    /// serves producer tokens as hex.
    pub api_url: String,

    /// Path of the latest-block endpoint, appended to `api_url`.
    pub latest_path: String,

    /// Path of the block-by-height endpoint; `{height}` is substituted.
    pub height_path: String,

    /// Poll period in milliseconds.
    pub poll_interval_ms: u64,

    /// Pause between sequential backfill fetches in milliseconds.
    pub backfill_delay_ms: u64,

    /// Largest gap closed by backfill.
    pub max_backfill_gap: u64,

    /// Number of recent blocks kept.
    pub window_capacity: usize,

    /// Number of skipped ranges remembered.
    pub skipped_log_capacity: usize,

    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,

    /// Producer token whose share is tracked.
    pub target_producer: Option<String>,

    /// Prefix used to render producer addresses.
    pub address_prefix: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:26657".to_string(),
            latest_path: "/block".to_string(),
            height_path: "/block?height={height}".to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            backfill_delay_ms: DEFAULT_BACKFILL_DELAY_MS,
            max_backfill_gap: MAX_BACKFILL_GAP,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            skipped_log_capacity: DEFAULT_SKIPPED_CAPACITY,
            request_timeout_secs: 10,
            target_producer: None,
            address_prefix: "cosmosvalcons".to_string(),
        }
    }
}

impl SyncConfig {
    /// Create a config for testing (no pacing, short period, small window).
    pub fn for_testing() -> Self {
        Self {
            api_url: "http://127.0.0.1:0".to_string(),
            poll_interval_ms: 50,
            backfill_delay_ms: 0,
            window_capacity: 10,
            skipped_log_capacity: 8,
            request_timeout_secs: 1,
            ..Self::default()
        }
    }

    /// Parse from TOML; missing fields take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_url",
                reason: "cannot be empty".into(),
            });
        }
        if !self.height_path.contains("{height}") {
            return Err(ConfigError::Invalid {
                field: "height_path",
                reason: "must contain {height}".into(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_ms",
                reason: "cannot be 0".into(),
            });
        }
        if self.window_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "window_capacity",
                reason: "cannot be 0".into(),
            });
        }
        if self.max_backfill_gap < 1 {
            return Err(ConfigError::Invalid {
                field: "max_backfill_gap",
                reason: "must be at least 1".into(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                reason: "cannot be 0".into(),
            });
        }
        if self.target_producer.as_deref() == Some("") {
            return Err(ConfigError::Invalid {
                field: "target_producer",
                reason: "cannot be empty; omit it instead".into(),
            });
        }
        Ok(())
    }

    /// Poll period.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Backfill pacing delay.
    pub fn backfill_delay(&self) -> Duration {
        Duration::from_millis(self.backfill_delay_ms)
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
