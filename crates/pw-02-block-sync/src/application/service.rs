//! # Block Sync Service
//!
//! Application service running the poll cycle: fetch the tip, classify the
//! gap, backfill or jump, fold accepted blocks into the state and publish
//! events.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::algorithms::{
    backfill_heights, classify_gap, project_stats, BlockProcessor, ProcessorSettings,
};
use crate::config::SyncConfig;
use crate::domain::{
    CycleReport, GapDecision, Height, PollOutcome, RawBlock, SkipReason, SkippedRange,
    StatsSnapshot, SyncError, SyncEvent, SyncSnapshot, SyncState, ValidatorDirectory,
};
use crate::ports::{BlockMonitorApi, ChainQuery, SyncEventSink};

/// Block Sync Service - follows the chain tip.
pub struct BlockSyncService<C: ChainQuery> {
    /// Configuration.
    config: SyncConfig,
    /// Chain API.
    chain: Arc<C>,
    /// Normalises blocks.
    processor: BlockProcessor,
    /// Sync state; the lock is never held across an await.
    state: RwLock<SyncState>,
    /// Held for the duration of one cycle.
    cycle_guard: Mutex<()>,
    /// Event consumers.
    sinks: Vec<Arc<dyn SyncEventSink>>,
    /// Completed cycles.
    cycles: AtomicU64,
}

impl<C: ChainQuery> BlockSyncService<C> {
    /// Create a new service with fresh state.
    pub fn new(config: SyncConfig, chain: Arc<C>, directory: Arc<ValidatorDirectory>) -> Self {
        let processor = BlockProcessor::new(directory, ProcessorSettings::from(&config));
        let state = SyncState::new(config.window_capacity, config.skipped_log_capacity);
        Self {
            config,
            chain,
            processor,
            state: RwLock::new(state),
            cycle_guard: Mutex::new(()),
            sinks: Vec::new(),
            cycles: AtomicU64::new(0),
        }
    }

    /// Add an event sink.
    pub fn with_sink(mut self, sink: Arc<dyn SyncEventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Number of cycles that ran to completion.
    pub fn cycles_completed(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    /// Poll on a fixed period until `shutdown` flips to true (or its sender
    /// is dropped).
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "[pw-02] Block sync started: {} every {:?}",
            self.chain.endpoint(),
            self.config.poll_interval()
        );

        let mut ticker = tokio::time::interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(
            "[pw-02] Block sync stopped after {} cycles",
            self.cycles_completed()
        );
    }

    /// One poll cycle.
    async fn run_cycle(&self) -> PollOutcome {
        let Ok(_cycle) = self.cycle_guard.try_lock() else {
            debug!("[pw-02] Previous cycle still running, skipping tick");
            return PollOutcome::Skipped;
        };

        let tip = match self.chain.latest_block().await {
            Ok(tip) => tip,
            Err(e) => {
                warn!("[pw-02] Failed to fetch latest block: {}", e);
                return PollOutcome::Failed(e);
            }
        };
        let Some(latest) = tip.height().filter(|h| *h > 0) else {
            let e = SyncError::malformed("latest block has no usable height");
            warn!("[pw-02] {}", e);
            return PollOutcome::Failed(e);
        };

        let last = self.state.read().last_height();
        let decision = classify_gap(last, latest, self.config.max_backfill_gap);
        let mut report = CycleReport {
            decision: decision.clone(),
            latest_height: latest,
            accepted: Vec::new(),
            skipped: Vec::new(),
            rejected: 0,
        };

        match &decision {
            GapDecision::UpToDate => {
                debug!("[pw-02] Up to date at height {}", latest);
            }
            GapDecision::Behind { by } => {
                warn!(
                    "[pw-02] Node tip {} is {} behind last processed height, ignoring",
                    latest, by
                );
            }
            GapDecision::Backfill { from, to } => {
                info!("[pw-02] Backfilling heights {}..={}", from, to);
                self.backfill(&decision, &mut report).await;
            }
            GapDecision::Jump {
                skipped_from,
                skipped_to,
            } => {
                self.record_skip(
                    SkippedRange {
                        from: *skipped_from,
                        to: *skipped_to,
                        reason: SkipReason::LargeGap,
                    },
                    &mut report,
                );
            }
            GapDecision::FirstSync | GapDecision::Next => {}
        }

        if decision.processes_tip() {
            if let Err(e) = self.accept(&tip, &mut report) {
                warn!("[pw-02] Latest block {} rejected: {}", latest, e);
                report.rejected += 1;
                if matches!(e, SyncError::MalformedBlock { .. }) {
                    self.record_skip(SkippedRange::single(latest, SkipReason::Malformed), &mut report);
                }
            }
            self.state.write().advance_to(latest);
        }

        if report.changed_stats() {
            let stats = self.current_stats();
            self.publish(&SyncEvent::StatsUpdated(stats));
        }

        self.cycles.fetch_add(1, Ordering::SeqCst);
        PollOutcome::Completed(report)
    }

    /// Fetch missing heights one by one, pausing between fetches.
    async fn backfill(&self, decision: &GapDecision, report: &mut CycleReport) {
        let delay = self.config.backfill_delay();

        for (i, height) in backfill_heights(decision).enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let raw = match self.chain.block_at(height).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("[pw-02] Backfill fetch failed at height {}: {}", height, e);
                    let reason = if e.is_transient() {
                        SkipReason::FetchFailed
                    } else {
                        SkipReason::Malformed
                    };
                    self.record_skip(SkippedRange::single(height, reason), report);
                    continue;
                }
            };

            let result = match raw.height() {
                Some(got) if got != height => Err(SyncError::HeightMismatch {
                    requested: height,
                    got,
                }),
                _ => self.accept(&raw, report),
            };

            if let Err(e) = result {
                warn!("[pw-02] Backfill block {} rejected: {}", height, e);
                report.rejected += 1;
                self.record_skip(SkippedRange::single(height, SkipReason::Malformed), report);
            }
        }
    }

    /// Process one block and publish it.
    fn accept(&self, raw: &RawBlock, report: &mut CycleReport) -> Result<(), SyncError> {
        let record = {
            let mut state = self.state.write();
            self.processor.process(&mut state, raw)?
        };
        report.accepted.push(record.height);
        self.publish(&SyncEvent::BlockAccepted(record));
        Ok(())
    }

    fn record_skip(&self, range: SkippedRange, report: &mut CycleReport) {
        self.state.write().record_skip(range.clone());
        report.skipped.push(range.clone());
        self.publish(&SyncEvent::RangeSkipped(range));
    }

    fn publish(&self, event: &SyncEvent) {
        for sink in &self.sinks {
            sink.publish(event);
        }
    }

    fn current_stats(&self) -> StatsSnapshot {
        project_stats(&self.state.read(), Instant::now())
    }
}

#[async_trait]
impl<C: ChainQuery> BlockMonitorApi for BlockSyncService<C> {
    async fn poll_once(&self) -> PollOutcome {
        self.run_cycle().await
    }

    fn snapshot(&self) -> SyncSnapshot {
        self.state.read().snapshot()
    }

    fn stats(&self) -> StatsSnapshot {
        self.current_stats()
    }

    fn last_height(&self) -> Option<Height> {
        self.state.read().last_height()
    }
}
