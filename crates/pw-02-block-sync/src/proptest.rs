//! Property-based tests for the sync state invariants.

use proptest::prelude::*;
use std::sync::Arc;

use crate::algorithms::{classify_gap, BlockProcessor, ProcessorSettings};
use crate::config::SyncConfig;
use crate::domain::{
    check_state, invariant_height_monotonic, GapDecision, RawBlock, SyncState,
    ValidatorDirectory,
};
use crate::ports::{BlockMonitorApi, MockChain};
use crate::BlockSyncService;

const PRODUCERS: [&str; 3] = [
    "000102030405060708090A0B0C0D0E0F10111213",
    "FFEEDDCCBBAA99887766554433221100FFEEDDCC",
    "short",
];

fn processor() -> BlockProcessor {
    BlockProcessor::new(
        Arc::new(ValidatorDirectory::empty()),
        ProcessorSettings {
            target_producer: Some(PRODUCERS[0].to_string()),
            address_prefix: "cosmos".to_string(),
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Whatever order heights arrive in, the window stays bounded,
    /// strictly descending, and tracked never exceeds total
    #[test]
    fn prop_processor_preserves_invariants(
        heights in prop::collection::vec(0u64..200, 0..80),
        capacity in 1usize..16,
    ) {
        let p = processor();
        let mut state = SyncState::new(capacity, 4);
        for (i, h) in heights.iter().enumerate() {
            let raw = RawBlock::new(*h, "2024-01-01T00:00:00Z", PRODUCERS[i % 3], "c", 0);
            let before = state.total_blocks_seen();
            let accepted = p.process(&mut state, &raw).is_ok();
            prop_assert_eq!(state.total_blocks_seen(), before + u64::from(accepted));
            prop_assert!(check_state(&state));
        }
    }

    /// Gap classification partitions every (last, latest) pair consistently
    #[test]
    fn prop_classify_gap_consistent(last in 1u64..10_000, delta in 0u64..100, limit in 1u64..50) {
        let latest = last + delta;
        match classify_gap(Some(last), latest, limit) {
            GapDecision::UpToDate => prop_assert_eq!(delta, 0),
            GapDecision::Next => prop_assert_eq!(delta, 1),
            GapDecision::Backfill { from, to } => {
                prop_assert!(delta > 1 && delta <= limit);
                prop_assert_eq!(from, last + 1);
                prop_assert_eq!(to, latest - 1);
            }
            GapDecision::Jump { skipped_from, skipped_to } => {
                prop_assert!(delta > limit);
                prop_assert_eq!(skipped_to - skipped_from + 1, delta - 1);
            }
            other => prop_assert!(false, "unexpected decision {:?}", other),
        }
    }

    /// Driving the service through arbitrary tip moves never breaks
    /// monotonicity or the window bound
    #[test]
    fn prop_service_state_invariants(moves in prop::collection::vec(-3i64..30, 1..25)) {
        let config = SyncConfig {
            target_producer: Some(PRODUCERS[0].to_string()),
            ..SyncConfig::for_testing()
        };
        let window = config.window_capacity;
        let chain = Arc::new(MockChain::new(50, PRODUCERS));
        let service = BlockSyncService::new(config, chain.clone(), Arc::new(ValidatorDirectory::empty()));

        tokio_test::block_on(async {
            let mut previous = None;
            for step in moves {
                let tip = (chain.tip() as i64 + step).max(1) as u64;
                chain.set_tip(tip);
                service.poll_once().await;

                let snap = service.snapshot();
                prop_assert!(invariant_height_monotonic(previous, snap.last_height));
                prop_assert!(snap.blocks.len() <= window);
                prop_assert!(snap.tracked_blocks_seen <= snap.total_blocks_seen);
                prop_assert!(snap.blocks.windows(2).all(|w| w[0].height > w[1].height));
                previous = snap.last_height;
            }
            Ok(())
        })?;
    }
}
