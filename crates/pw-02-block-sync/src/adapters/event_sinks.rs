//! Event Sink Adapters
//!
//! `TracingEventSink` turns events into structured log lines;
//! `ChannelEventSink` forwards them to another task.

use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::{SkipReason, SyncEvent};
use crate::ports::outbound::SyncEventSink;
use pw_telemetry::{log_block_event, log_event, log_range_event};

const SUBSYSTEM: &str = "pw-02";

/// Logs every event through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl SyncEventSink for TracingEventSink {
    fn publish(&self, event: &SyncEvent) {
        match event {
            SyncEvent::BlockAccepted(record) => {
                log_block_event!(
                    info,
                    SUBSYSTEM,
                    "Block accepted",
                    record.height,
                    record.producer_name,
                    txs = record.transaction_count,
                    tracked = record.is_tracked_producer
                );
            }
            SyncEvent::StatsUpdated(stats) => {
                log_event!(
                    debug,
                    SUBSYSTEM,
                    "Stats updated",
                    total = stats.total_blocks,
                    tracked = stats.tracked_blocks,
                    share = %stats.share_display(),
                    uptime = %stats.uptime_display()
                );
            }
            SyncEvent::RangeSkipped(range) => {
                let reason = match range.reason {
                    SkipReason::LargeGap => "large gap",
                    SkipReason::FetchFailed => "fetch failed",
                    SkipReason::Malformed => "malformed block",
                };
                log_range_event!(
                    warn,
                    SUBSYSTEM,
                    "Heights skipped",
                    range.from,
                    range.to,
                    count = range.len(),
                    reason = reason
                );
            }
        }
    }
}

/// Forwards events into a bounded tokio channel.
///
/// Never blocks: when the receiver lags and the channel is full the event
/// is dropped with a warning.
#[derive(Clone, Debug)]
pub struct ChannelEventSink {
    sender: mpsc::Sender<SyncEvent>,
}

impl ChannelEventSink {
    /// Wrap an existing sender.
    pub fn new(sender: mpsc::Sender<SyncEvent>) -> Self {
        Self { sender }
    }

    /// Create a sink and its receiver.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SyncEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender), receiver)
    }
}

impl SyncEventSink for ChannelEventSink {
    fn publish(&self, event: &SyncEvent) {
        match self.sender.try_send(event.clone()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("[pw-02] Event channel full, dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!("[pw-02] Event receiver gone, dropping event");
            }
        }
    }
}
