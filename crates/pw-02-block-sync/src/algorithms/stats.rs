//! # Stats Aggregator
//!
//! Read-only projection of [`SyncState`] into display metrics.

use std::time::Instant;

use crate::domain::{StatsSnapshot, SyncState};

/// Project the counters of `state` as of `now`.
///
/// Pure: the same state and `now` always yield the same snapshot. A `now`
/// earlier than the start instant gives zero uptime.
pub fn project_stats(state: &SyncState, now: Instant) -> StatsSnapshot {
    let total = state.total_blocks_seen();
    let tracked = state.tracked_blocks_seen();

    let share_percent = if total == 0 {
        0.0
    } else {
        tracked as f64 / total as f64 * 100.0
    };

    StatsSnapshot {
        total_blocks: total,
        tracked_blocks: tracked,
        share_percent,
        uptime: now.saturating_duration_since(state.start_instant()),
        last_height: state.last_height(),
        heights_skipped: state.heights_skipped(),
    }
}

impl StatsSnapshot {
    /// See [`project_stats`].
    pub fn project(state: &SyncState, now: Instant) -> Self {
        project_stats(state, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockRecord, SkipReason, SkippedRange};
    use chrono::{DateTime, Utc};
    use std::time::Duration;

    fn record(height: u64, tracked: bool) -> BlockRecord {
        BlockRecord {
            height,
            timestamp: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            producer_identity: "AB".repeat(20),
            producer_name: "v".to_string(),
            producer_address: None,
            transaction_count: 1,
            chain_id: "test-1".to_string(),
            is_tracked_producer: tracked,
        }
    }

    #[test]
    fn test_empty_state_has_zero_share() {
        let start = Instant::now();
        let state = SyncState::started_at(5, 5, start);
        let stats = project_stats(&state, start);
        assert_eq!(stats.total_blocks, 0);
        assert_eq!(stats.share_percent, 0.0);
        assert_eq!(stats.share_display(), "0.00");
        assert_eq!(stats.uptime, Duration::ZERO);
        assert_eq!(stats.last_height, None);
    }

    #[test]
    fn test_share_and_uptime() {
        let start = Instant::now();
        let mut state = SyncState::started_at(5, 5, start);
        state.accept(record(1, true));
        state.accept(record(2, false));
        state.accept(record(3, false));
        state.advance_to(3);

        let stats = StatsSnapshot::project(&state, start + Duration::from_secs(61));
        assert_eq!(stats.total_blocks, 3);
        assert_eq!(stats.tracked_blocks, 1);
        assert_eq!(stats.share_display(), "33.33");
        assert_eq!(stats.uptime_display(), "00h 01m 01s");
        assert_eq!(stats.last_height, Some(3));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let start = Instant::now();
        let mut state = SyncState::started_at(5, 5, start);
        state.accept(record(1, true));
        state.record_skip(SkippedRange::single(4, SkipReason::FetchFailed));
        let now = start + Duration::from_secs(5);
        let first = project_stats(&state, now);
        let second = project_stats(&state, now);
        assert_eq!(first, second);
        assert_eq!(first.heights_skipped, 1);
        assert_eq!(state.total_blocks_seen(), 1);
    }

    #[test]
    fn test_now_before_start_saturates() {
        let start = Instant::now() + Duration::from_secs(10);
        let state = SyncState::started_at(5, 5, start);
        assert_eq!(project_stats(&state, Instant::now()).uptime, Duration::ZERO);
    }
}
