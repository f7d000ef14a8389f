//! # Block Processor
//!
//! Normalises one raw block into a [`BlockRecord`] and folds it into the
//! sync state.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::SyncConfig;
use crate::domain::{BlockRecord, RawBlock, SyncError, SyncState, ValidatorDirectory};

/// Settings the processor needs from the service configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessorSettings {
    /// Token whose blocks count as tracked.
    pub target_producer: Option<String>,
    /// Prefix for rendered producer addresses.
    pub address_prefix: String,
}

impl From<&SyncConfig> for ProcessorSettings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            target_producer: config.target_producer.clone(),
            address_prefix: config.address_prefix.clone(),
        }
    }
}

/// Turns raw blocks into records and applies them to a [`SyncState`].
#[derive(Clone, Debug)]
pub struct BlockProcessor {
    directory: Arc<ValidatorDirectory>,
    settings: ProcessorSettings,
}

impl BlockProcessor {
    /// Create a processor resolving names through `directory`.
    pub fn new(directory: Arc<ValidatorDirectory>, settings: ProcessorSettings) -> Self {
        Self {
            directory,
            settings,
        }
    }

    /// Validate and normalise without touching any state.
    ///
    /// # Errors
    /// - `MalformedBlock` if height, producer or time is missing or unparsable
    pub fn normalize(&self, raw: &RawBlock) -> Result<BlockRecord, SyncError> {
        let header = raw
            .header
            .as_ref()
            .ok_or_else(|| SyncError::malformed("missing header"))?;

        let height = header
            .height
            .as_ref()
            .ok_or_else(|| SyncError::malformed("missing height"))?
            .value()
            .ok_or_else(|| SyncError::malformed("height is not an integer"))?;
        if height == 0 {
            return Err(SyncError::malformed("height must be positive"));
        }

        let producer = raw
            .proposer()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| SyncError::malformed(format!("missing producer at height {height}")))?;

        let time = header
            .time
            .as_deref()
            .ok_or_else(|| SyncError::malformed(format!("missing time at height {height}")))?;
        let timestamp = DateTime::parse_from_rfc3339(time)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| SyncError::malformed(format!("bad time {time:?}: {e}")))?;

        let is_tracked_producer = self.settings.target_producer.as_deref() == Some(producer);

        Ok(BlockRecord {
            height,
            timestamp,
            producer_identity: producer.to_string(),
            producer_name: self.directory.display_name(producer),
            producer_address: render_producer_address(producer, &self.settings.address_prefix),
            transaction_count: raw.tx_count(),
            chain_id: header.chain_id.clone().unwrap_or_default(),
            is_tracked_producer,
        })
    }

    /// Normalise `raw` and fold it into `state`.
    ///
    /// On error nothing in `state` changes.
    ///
    /// # Errors
    /// - `MalformedBlock` from [`normalize`](Self::normalize)
    /// - `StaleBlock` if the height is not above the newest stored record
    pub fn process(&self, state: &mut SyncState, raw: &RawBlock) -> Result<BlockRecord, SyncError> {
        let record = self.normalize(raw)?;

        if let Some(newest) = state.newest_height() {
            if record.height <= newest {
                return Err(SyncError::StaleBlock {
                    height: record.height,
                    newest,
                });
            }
        }

        state.accept(record.clone());
        Ok(record)
    }
}

/// Render a hex producer token (optionally `0x`-prefixed) as a checksummed
/// address. `None` when the token is not 20 bytes of hex.
pub fn render_producer_address(token: &str, prefix: &str) -> Option<String> {
    let body = token.strip_prefix("0x").unwrap_or(token);
    let bytes = hex::decode(body).ok()?;
    pw_01_address_codec::encode(prefix, &bytes).ok()
}
