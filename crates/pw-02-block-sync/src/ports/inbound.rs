//! # Inbound Ports
//!
//! API trait defining what the block monitor offers its callers.

use async_trait::async_trait;

use crate::domain::{Height, PollOutcome, StatsSnapshot, SyncSnapshot};

/// Block Monitor API - inbound port.
#[async_trait]
pub trait BlockMonitorApi: Send + Sync {
    /// Run one poll cycle.
    async fn poll_once(&self) -> PollOutcome;

    /// Owned copy of the current sync state.
    fn snapshot(&self) -> SyncSnapshot;

    /// Current statistics.
    fn stats(&self) -> StatsSnapshot;

    /// Last processed height.
    fn last_height(&self) -> Option<Height>;
}
