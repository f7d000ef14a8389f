//! # Gap Resolver
//!
//! Decides how much work a poll cycle does from the last processed height
//! and the current tip.

use std::ops::RangeInclusive;

use crate::domain::{GapDecision, Height};

/// Classify the distance between `last` and `latest`.
///
/// | Condition | Decision |
/// |-----------|----------|
/// | `last` unset | `FirstSync` |
/// | `latest == last` | `UpToDate` |
/// | `latest < last` | `Behind` |
/// | gap 1 | `Next` |
/// | `1 < gap <= max_backfill_gap` | `Backfill { last+1 ..= latest-1 }` |
/// | `gap > max_backfill_gap` | `Jump`, discarding `last+1 ..= latest-1` |
pub fn classify_gap(last: Option<Height>, latest: Height, max_backfill_gap: u64) -> GapDecision {
    let Some(last) = last else {
        return GapDecision::FirstSync;
    };

    if latest < last {
        return GapDecision::Behind { by: last - latest };
    }

    match latest - last {
        0 => GapDecision::UpToDate,
        1 => GapDecision::Next,
        gap if gap <= max_backfill_gap => GapDecision::Backfill {
            from: last + 1,
            to: latest - 1,
        },
        _ => GapDecision::Jump {
            skipped_from: last + 1,
            skipped_to: latest - 1,
        },
    }
}

/// Heights fetched individually for a decision, in fetch order.
pub fn backfill_heights(decision: &GapDecision) -> RangeInclusive<Height> {
    match decision {
        GapDecision::Backfill { from, to } => *from..=*to,
        _ => RangeInclusive::new(1, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sync() {
        assert_eq!(classify_gap(None, 500, 20), GapDecision::FirstSync);
    }

    #[test]
    fn test_gap_zero() {
        assert_eq!(classify_gap(Some(100), 100, 20), GapDecision::UpToDate);
    }

    #[test]
    fn test_gap_one() {
        assert_eq!(classify_gap(Some(100), 101, 20), GapDecision::Next);
    }

    #[test]
    fn test_gap_five_backfills_four() {
        let decision = classify_gap(Some(100), 105, 20);
        assert_eq!(decision, GapDecision::Backfill { from: 101, to: 104 });
        assert_eq!(backfill_heights(&decision).count(), 4);
    }

    #[test]
    fn test_gap_at_limit_backfills() {
        assert_eq!(
            classify_gap(Some(100), 120, 20),
            GapDecision::Backfill { from: 101, to: 119 }
        );
    }

    #[test]
    fn test_gap_above_limit_jumps() {
        assert_eq!(
            classify_gap(Some(100), 121, 20),
            GapDecision::Jump {
                skipped_from: 101,
                skipped_to: 120
            }
        );
    }

    #[test]
    fn test_gap_twenty_five_skips_twenty_four() {
        let decision = classify_gap(Some(100), 125, 20);
        let GapDecision::Jump {
            skipped_from,
            skipped_to,
        } = decision
        else {
            panic!("expected jump, got {decision:?}");
        };
        assert_eq!(skipped_to - skipped_from + 1, 24);
        assert_eq!(backfill_heights(&decision).count(), 0);
    }

    #[test]
    fn test_tip_behind() {
        assert_eq!(classify_gap(Some(100), 97, 20), GapDecision::Behind { by: 3 });
    }

    #[test]
    fn test_custom_limit() {
        assert_eq!(
            classify_gap(Some(10), 13, 2),
            GapDecision::Jump {
                skipped_from: 11,
                skipped_to: 12
            }
        );
    }
}
