//! # Domain Entities
//!
//! Core entities for Block Sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;

use super::errors::Height;
use super::value_objects::SkippedRange;

/// One accepted block, normalised for display.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockRecord {
    /// Block height (> 0).
    pub height: Height,
    /// Block time.
    pub timestamp: DateTime<Utc>,
    /// Producer token exactly as the chain supplied it.
    pub producer_identity: String,
    /// Directory name, or a truncated form of the token.
    pub producer_name: String,
    /// Checksummed address of the producer when the token is a 20-byte hex value.
    pub producer_address: Option<String>,
    /// Number of transactions in the block.
    pub transaction_count: usize,
    /// Chain identifier (empty when the block did not carry one).
    pub chain_id: String,
    /// Authored by the configured target producer?
    pub is_tracked_producer: bool,
}

/// Fixed-capacity, newest-first collection with FIFO eviction.
#[derive(Clone, Debug)]
pub struct BoundedLog<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    /// Create an empty log holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front; returns the evicted oldest item when over capacity.
    pub fn push_front(&mut self, item: T) -> Option<T> {
        self.items.push_front(item);
        if self.items.len() > self.capacity {
            self.items.pop_back()
        } else {
            None
        }
    }

    /// Newest item.
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    /// Oldest item.
    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Current length.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum length.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> BoundedLog<T> {
    /// Copy out newest to oldest.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

/// Mutable sync state. Owned by one service; written by one cycle at a time.
#[derive(Clone, Debug)]
pub struct SyncState {
    last_height: Option<Height>,
    blocks: BoundedLog<BlockRecord>,
    total_blocks_seen: u64,
    tracked_blocks_seen: u64,
    skipped_ranges: BoundedLog<SkippedRange>,
    heights_skipped: u64,
    started_at: Instant,
}

impl SyncState {
    /// Fresh state: nothing processed, clock started now.
    pub fn new(window_capacity: usize, skipped_capacity: usize) -> Self {
        Self::started_at(window_capacity, skipped_capacity, Instant::now())
    }

    /// Fresh state with an explicit start instant.
    pub fn started_at(window_capacity: usize, skipped_capacity: usize, started_at: Instant) -> Self {
        Self {
            last_height: None,
            blocks: BoundedLog::new(window_capacity),
            total_blocks_seen: 0,
            tracked_blocks_seen: 0,
            skipped_ranges: BoundedLog::new(skipped_capacity),
            heights_skipped: 0,
            started_at,
        }
    }

    /// Last processed height.
    pub fn last_height(&self) -> Option<Height> {
        self.last_height
    }

    /// Move `last_height` forward. Returns false (and changes nothing) when
    /// `height` would not increase it.
    pub fn advance_to(&mut self, height: Height) -> bool {
        match self.last_height {
            Some(current) if height <= current => false,
            _ => {
                self.last_height = Some(height);
                true
            }
        }
    }

    /// Height of the newest stored record.
    pub fn newest_height(&self) -> Option<Height> {
        self.blocks.front().map(|b| b.height)
    }

    /// Fold an accepted record into the counters and the window.
    ///
    /// Callers must have checked that `record.height` is above
    /// [`newest_height`](Self::newest_height).
    pub(crate) fn accept(&mut self, record: BlockRecord) -> Option<BlockRecord> {
        self.total_blocks_seen += 1;
        if record.is_tracked_producer {
            self.tracked_blocks_seen += 1;
        }
        self.blocks.push_front(record)
    }

    /// Remember a range that will never be processed.
    pub fn record_skip(&mut self, range: SkippedRange) {
        self.heights_skipped += range.len();
        self.skipped_ranges.push_front(range);
    }

    /// Recent blocks, newest first.
    pub fn blocks(&self) -> &BoundedLog<BlockRecord> {
        &self.blocks
    }

    /// Recent skipped ranges, newest first.
    pub fn skipped_ranges(&self) -> &BoundedLog<SkippedRange> {
        &self.skipped_ranges
    }

    /// Blocks accepted since start.
    pub fn total_blocks_seen(&self) -> u64 {
        self.total_blocks_seen
    }

    /// Tracked-producer blocks accepted since start.
    pub fn tracked_blocks_seen(&self) -> u64 {
        self.tracked_blocks_seen
    }

    /// Total heights never processed.
    pub fn heights_skipped(&self) -> u64 {
        self.heights_skipped
    }

    /// When monitoring started.
    pub fn start_instant(&self) -> Instant {
        self.started_at
    }

    /// Owned copy for readers.
    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            last_height: self.last_height,
            blocks: self.blocks.to_vec(),
            total_blocks_seen: self.total_blocks_seen,
            tracked_blocks_seen: self.tracked_blocks_seen,
            skipped_ranges: self.skipped_ranges.to_vec(),
            heights_skipped: self.heights_skipped,
        }
    }
}

/// Point-in-time copy of [`SyncState`] handed to readers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    /// Last processed height.
    pub last_height: Option<Height>,
    /// Window, newest first.
    pub blocks: Vec<BlockRecord>,
    /// Blocks accepted since start.
    pub total_blocks_seen: u64,
    /// Tracked-producer blocks.
    pub tracked_blocks_seen: u64,
    /// Recent skipped ranges, newest first.
    pub skipped_ranges: Vec<SkippedRange>,
    /// Total heights never processed.
    pub heights_skipped: u64,
}
