//! # Domain Value Objects
//!
//! Wire shapes consumed from the chain API and the immutable values the
//! sync pipeline produces.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::entities::BlockRecord;
use super::errors::{Height, SyncError};

// =============================================================================
// Wire shapes
// =============================================================================

/// Height as served by the API: usually a decimal string, sometimes a number.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum HeightField {
    /// `"12345"`
    Text(String),
    /// `12345`
    Number(u64),
}

impl HeightField {
    /// Parsed height, `None` when the text is not a base-10 integer.
    pub fn value(&self) -> Option<Height> {
        match self {
            HeightField::Text(s) => s.trim().parse().ok(),
            HeightField::Number(n) => Some(*n),
        }
    }
}

/// Block header fields the pipeline reads.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RawHeader {
    /// Block height.
    #[serde(default)]
    pub height: Option<HeightField>,
    /// ISO-8601 block time.
    #[serde(default)]
    pub time: Option<String>,
    /// Transport-encoded producer identity.
    #[serde(default)]
    pub proposer_address: Option<String>,
    /// Chain identifier.
    #[serde(default)]
    pub chain_id: Option<String>,
}

/// Block body; only the transaction count is used.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RawData {
    /// Encoded transactions, absent or null on empty blocks for some nodes.
    #[serde(default)]
    pub txs: Option<Vec<serde_json::Value>>,
}

/// A block exactly as the chain API delivered it.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RawBlock {
    /// Header section.
    #[serde(default)]
    pub header: Option<RawHeader>,
    /// Data section.
    #[serde(default)]
    pub data: Option<RawData>,
}

impl RawBlock {
    /// Build a well-formed block (tests, mocks).
    pub fn new(
        height: Height,
        time: impl Into<String>,
        proposer: impl Into<String>,
        chain_id: impl Into<String>,
        tx_count: usize,
    ) -> Self {
        Self {
            header: Some(RawHeader {
                height: Some(HeightField::Text(height.to_string())),
                time: Some(time.into()),
                proposer_address: Some(proposer.into()),
                chain_id: Some(chain_id.into()),
            }),
            data: Some(RawData {
                txs: Some(vec![serde_json::Value::String(String::new()); tx_count]),
            }),
        }
    }

    /// Parsed header height, if present and numeric.
    pub fn height(&self) -> Option<Height> {
        self.header.as_ref()?.height.as_ref()?.value()
    }

    /// Producer token, if present.
    pub fn proposer(&self) -> Option<&str> {
        self.header.as_ref()?.proposer_address.as_deref()
    }

    /// Number of transactions; 0 when the list is absent.
    pub fn tx_count(&self) -> usize {
        self.data
            .as_ref()
            .and_then(|d| d.txs.as_ref())
            .map_or(0, Vec::len)
    }
}

// =============================================================================
// Gap classification
// =============================================================================

/// What one poll cycle does, given the last processed height and the tip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapDecision {
    /// Nothing processed yet: take the tip only.
    FirstSync,
    /// Tip unchanged.
    UpToDate,
    /// Node reports a tip below what was already processed.
    Behind {
        /// How far behind
        by: Height,
    },
    /// Exactly one new block.
    Next,
    /// Small gap: fetch `from..=to` one by one, then the tip.
    Backfill {
        /// First missing height
        from: Height,
        /// Last missing height (tip - 1)
        to: Height,
    },
    /// Large gap: take the tip, drop `skipped_from..=skipped_to`.
    Jump {
        /// First discarded height
        skipped_from: Height,
        /// Last discarded height
        skipped_to: Height,
    },
}

impl GapDecision {
    /// True when the tip block gets processed this cycle.
    pub fn processes_tip(&self) -> bool {
        !matches!(self, GapDecision::UpToDate | GapDecision::Behind { .. })
    }
}

/// Why a height range was not processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Gap above the backfill limit.
    LargeGap,
    /// Backfill fetch failed.
    FetchFailed,
    /// Backfill fetch returned an unusable block.
    Malformed,
}

/// Inclusive range of heights that were never processed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRange {
    /// First height
    pub from: Height,
    /// Last height (inclusive)
    pub to: Height,
    /// Reason
    pub reason: SkipReason,
}

impl SkippedRange {
    /// Single-height range.
    pub fn single(height: Height, reason: SkipReason) -> Self {
        Self {
            from: height,
            to: height,
            reason,
        }
    }

    /// Number of heights covered.
    pub fn len(&self) -> u64 {
        self.to.saturating_sub(self.from) + 1
    }

    /// Always false; a range covers at least one height.
    pub fn is_empty(&self) -> bool {
        false
    }
}

// =============================================================================
// Read-side projections and events
// =============================================================================

/// Display-ready metrics derived from the sync state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Blocks accepted since start.
    pub total_blocks: u64,
    /// Accepted blocks authored by the tracked producer.
    pub tracked_blocks: u64,
    /// `tracked / total * 100`, 0 when nothing was seen.
    pub share_percent: f64,
    /// Time since monitoring started.
    pub uptime: Duration,
    /// Last processed height.
    pub last_height: Option<Height>,
    /// Heights deliberately or accidentally not processed.
    pub heights_skipped: u64,
}

impl StatsSnapshot {
    /// Share with two decimals, e.g. `"33.33"`.
    pub fn share_display(&self) -> String {
        format!("{:.2}", self.share_percent)
    }

    /// Uptime as `HHh MMm SSs`.
    pub fn uptime_display(&self) -> String {
        let secs = self.uptime.as_secs();
        format!("{:02}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// Event published to UI / observability sinks.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncEvent {
    /// A block was accepted into the window.
    BlockAccepted(BlockRecord),
    /// Counters changed.
    StatsUpdated(StatsSnapshot),
    /// A height range will never be processed.
    RangeSkipped(SkippedRange),
}

// =============================================================================
// Cycle results
// =============================================================================

/// What one completed poll cycle did.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    /// Gap classification for this cycle.
    pub decision: GapDecision,
    /// Tip height reported by the node.
    pub latest_height: Height,
    /// Heights accepted into the window, in processing order.
    pub accepted: Vec<Height>,
    /// Ranges recorded as skipped during this cycle.
    pub skipped: Vec<SkippedRange>,
    /// Blocks rejected by the processor (malformed or stale).
    pub rejected: usize,
}

impl CycleReport {
    /// True when at least one block was accepted.
    pub fn made_progress(&self) -> bool {
        !self.accepted.is_empty()
    }

    /// True when any counter moved: a block was accepted or a range skipped.
    pub fn changed_stats(&self) -> bool {
        self.made_progress() || !self.skipped.is_empty()
    }
}

/// Result of [`poll_once`](crate::ports::BlockMonitorApi::poll_once).
#[derive(Clone, Debug, PartialEq)]
pub enum PollOutcome {
    /// Another cycle was still running; nothing was done.
    Skipped,
    /// The tip could not be fetched; state untouched.
    Failed(SyncError),
    /// The cycle ran to completion.
    Completed(CycleReport),
}

impl PollOutcome {
    /// The report of a completed cycle.
    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            PollOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}
