//! # Algorithms
//!
//! Pure sync logic: gap classification, block normalisation, stats projection.

pub mod block_processor;
pub mod gap_resolver;
pub mod stats;

pub use block_processor::{render_producer_address, BlockProcessor, ProcessorSettings};
pub use gap_resolver::{backfill_heights, classify_gap};
pub use stats::project_stats;
