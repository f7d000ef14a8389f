//! # Domain Invariants
//!
//! Rules that must hold after every state update.

use super::entities::{BlockRecord, SyncState};
use super::errors::Height;

/// Largest gap closed by backfill; anything above jumps straight to the tip.
pub const MAX_BACKFILL_GAP: u64 = 20;

/// Default number of recent blocks kept for display.
pub const DEFAULT_WINDOW_CAPACITY: usize = 50;

/// Default number of skipped ranges remembered.
pub const DEFAULT_SKIPPED_CAPACITY: usize = 32;

/// Default poll period in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 6_000;

/// Default pause between backfill fetches in milliseconds.
pub const DEFAULT_BACKFILL_DELAY_MS: u64 = 200;

/// Invariant: tracked blocks never exceed total blocks.
pub fn invariant_tracked_le_total(state: &SyncState) -> bool {
    state.tracked_blocks_seen() <= state.total_blocks_seen()
}

/// Invariant: window never exceeds its capacity.
pub fn invariant_window_bounded(state: &SyncState) -> bool {
    state.blocks().len() <= state.blocks().capacity()
}

/// Invariant: window heights strictly decrease front to back (so no duplicates).
pub fn invariant_strictly_descending(blocks: &[BlockRecord]) -> bool {
    blocks.windows(2).all(|w| w[0].height > w[1].height)
}

/// Invariant: last height never moves backwards.
pub fn invariant_height_monotonic(before: Option<Height>, after: Option<Height>) -> bool {
    match (before, after) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(b), Some(a)) => a >= b,
    }
}

/// Check every state invariant at once.
pub fn check_state(state: &SyncState) -> bool {
    invariant_tracked_le_total(state)
        && invariant_window_bounded(state)
        && invariant_strictly_descending(&state.blocks().to_vec())
}
