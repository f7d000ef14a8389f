//! # Outbound Ports
//!
//! Traits for external dependencies (the chain API, event consumers).

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::{Height, RawBlock, SyncError, SyncEvent};

/// Chain API - outbound port.
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Current tip block.
    async fn latest_block(&self) -> Result<RawBlock, SyncError>;

    /// Block at a specific height.
    async fn block_at(&self, height: Height) -> Result<RawBlock, SyncError>;

    /// Where blocks come from (for logging).
    fn endpoint(&self) -> &str;
}

/// Consumer of sync events - outbound port.
///
/// Called with the state lock released; implementations must not block.
pub trait SyncEventSink: Send + Sync {
    /// Deliver one event.
    fn publish(&self, event: &SyncEvent);
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Seconds between generated mock blocks.
const MOCK_BLOCK_TIME_SECS: i64 = 6;

/// 2024-01-01T00:00:00Z
const MOCK_GENESIS_UNIX: i64 = 1_704_067_200;

/// Mock chain for testing.
///
/// Serves a generated block for every height up to the tip. Producers rotate
/// through `producers` by height; individual heights can be overridden or
/// made to fail.
pub struct MockChain {
    id: String,
    chain_id: String,
    producers: Vec<String>,
    tip: AtomicU64,
    fail_latest: AtomicBool,
    latency: Mutex<Duration>,
    overrides: Mutex<HashMap<Height, RawBlock>>,
    failing: Mutex<HashMap<Height, SyncError>>,
    requested: Mutex<Vec<Height>>,
    latest_calls: AtomicU64,
}

impl MockChain {
    /// Mock chain at `tip`, rotating through `producers`.
    pub fn new<I, S>(tip: Height, producers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: "mock-chain".to_string(),
            chain_id: "mock-1".to_string(),
            producers: producers.into_iter().map(Into::into).collect(),
            tip: AtomicU64::new(tip),
            fail_latest: AtomicBool::new(false),
            latency: Mutex::new(Duration::ZERO),
            overrides: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashMap::new()),
            requested: Mutex::new(Vec::new()),
            latest_calls: AtomicU64::new(0),
        }
    }

    /// Current tip.
    pub fn tip(&self) -> Height {
        self.tip.load(Ordering::SeqCst)
    }

    /// Move the tip to `height`.
    pub fn set_tip(&self, height: Height) {
        self.tip.store(height, Ordering::SeqCst);
    }

    /// Move the tip forward by `blocks`.
    pub fn advance(&self, blocks: u64) {
        self.tip.fetch_add(blocks, Ordering::SeqCst);
    }

    /// Make `latest_block` fail (or recover).
    pub fn set_fail_latest(&self, fail: bool) {
        self.fail_latest.store(fail, Ordering::SeqCst);
    }

    /// Make `block_at(height)` fail with a network error.
    pub fn fail_height(&self, height: Height) {
        self.fail_height_with(height, SyncError::Network(format!("Mock failure at {height}")));
    }

    /// Make `block_at(height)` fail with `error`.
    pub fn fail_height_with(&self, height: Height, error: SyncError) {
        self.failing.lock().insert(height, error);
    }

    /// Serve `block` for `height` instead of the generated one.
    pub fn override_block(&self, height: Height, block: RawBlock) {
        self.overrides.lock().insert(height, block);
    }

    /// Delay applied to every request.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    /// Heights requested through `block_at`, in order.
    pub fn requested_heights(&self) -> Vec<Height> {
        self.requested.lock().clone()
    }

    /// Number of `latest_block` calls.
    pub fn latest_calls(&self) -> u64 {
        self.latest_calls.load(Ordering::SeqCst)
    }

    /// Producer the generated block at `height` carries.
    pub fn producer_at(&self, height: Height) -> Option<&str> {
        if self.producers.is_empty() {
            return None;
        }
        let index = (height % self.producers.len() as u64) as usize;
        self.producers.get(index).map(String::as_str)
    }

    /// Block served for `height`.
    pub fn block(&self, height: Height) -> RawBlock {
        if let Some(block) = self.overrides.lock().get(&height) {
            return block.clone();
        }
        let time = DateTime::<Utc>::from_timestamp(
            MOCK_GENESIS_UNIX + height as i64 * MOCK_BLOCK_TIME_SECS,
            0,
        )
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();
        RawBlock::new(
            height,
            time,
            self.producer_at(height).unwrap_or_default(),
            self.chain_id.clone(),
            (height % 3) as usize,
        )
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ChainQuery for MockChain {
    async fn latest_block(&self) -> Result<RawBlock, SyncError> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.fail_latest.load(Ordering::SeqCst) {
            return Err(SyncError::Network("Mock failure".to_string()));
        }
        Ok(self.block(self.tip()))
    }

    async fn block_at(&self, height: Height) -> Result<RawBlock, SyncError> {
        self.requested.lock().push(height);
        self.simulate_latency().await;

        if let Some(error) = self.failing.lock().get(&height) {
            return Err(error.clone());
        }
        if height == 0 || height > self.tip() {
            return Err(SyncError::Http {
                status: 404,
                url: format!("{}/block?height={height}", self.id),
            });
        }
        Ok(self.block(height))
    }

    fn endpoint(&self) -> &str {
        &self.id
    }
}

/// Sink that stores every event (tests).
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().clone()
    }

    /// Heights of `BlockAccepted` events, in publication order.
    pub fn accepted_heights(&self) -> Vec<Height> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SyncEvent::BlockAccepted(record) => Some(record.height),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl SyncEventSink for RecordingSink {
    fn publish(&self, event: &SyncEvent) {
        self.events.lock().push(event.clone());
    }
}
