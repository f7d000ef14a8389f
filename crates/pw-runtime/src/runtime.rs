//! Task wiring: the sync loop plus a summary task fed through the event
//! channel.

use pw_02_block_sync::{
    BlockMonitorApi, BlockSyncService, ChainQuery, ChannelEventSink, SyncConfig, SyncEvent,
    TracingEventSink, ValidatorDirectory,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Capacity of the event channel feeding the summary task.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The running monitor.
pub struct MonitorRuntime<C: ChainQuery + 'static> {
    service: Arc<BlockSyncService<C>>,
    events: Option<mpsc::Receiver<SyncEvent>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl<C: ChainQuery + 'static> MonitorRuntime<C> {
    /// Build the service with a tracing sink and a channel sink.
    pub fn new(config: SyncConfig, chain: Arc<C>, directory: Arc<ValidatorDirectory>) -> Self {
        let (channel_sink, events) = ChannelEventSink::channel(EVENT_CHANNEL_CAPACITY);
        let service = BlockSyncService::new(config, chain, directory)
            .with_sink(Arc::new(TracingEventSink))
            .with_sink(Arc::new(channel_sink));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            service: Arc::new(service),
            events: Some(events),
            shutdown_tx,
            shutdown_rx,
            tasks: Vec::new(),
        }
    }

    /// The sync service.
    pub fn service(&self) -> &Arc<BlockSyncService<C>> {
        &self.service
    }

    /// Spawn the sync loop and the summary task. Calling it twice does nothing.
    pub fn start(&mut self) {
        let Some(events) = self.events.take() else {
            return;
        };

        let service = self.service.clone();
        let shutdown = self.shutdown_rx.clone();
        self.tasks.push(tokio::spawn(async move {
            service.run(shutdown).await;
        }));

        let shutdown = self.shutdown_rx.clone();
        self.tasks.push(tokio::spawn(summarize(events, shutdown)));
    }

    /// Signal shutdown and wait for both tasks.
    pub async fn shutdown(self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        for task in self.tasks {
            if let Err(e) = task.await {
                error!("Task failed during shutdown: {}", e);
            }
        }

        let stats = self.service.stats();
        info!(
            "Stopped. Blocks: {} | Tracked: {} ({}%) | Skipped heights: {} | Uptime: {}",
            stats.total_blocks,
            stats.tracked_blocks,
            stats.share_display(),
            stats.heights_skipped,
            stats.uptime_display()
        );
    }
}

/// Log a one-line summary whenever the counters change.
async fn summarize(mut events: mpsc::Receiver<SyncEvent>, mut shutdown: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SyncEvent::StatsUpdated(stats)) => {
                    info!(
                        "Height: {} | Blocks: {} | Tracked: {} ({}%) | Uptime: {}",
                        stats.last_height.unwrap_or_default(),
                        stats.total_blocks,
                        stats.tracked_blocks,
                        stats.share_display(),
                        stats.uptime_display()
                    );
                }
                Some(_) => {}
                None => break,
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_02_block_sync::MockChain;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_runtime_polls_until_shutdown() {
        let chain = Arc::new(MockChain::new(10, ["AA", "BB"]));
        let mut runtime = MonitorRuntime::new(
            SyncConfig::for_testing(),
            chain.clone(),
            Arc::new(ValidatorDirectory::empty()),
        );
        runtime.start();
        runtime.start();

        tokio::time::sleep(Duration::from_millis(75)).await;
        chain.advance(2);
        tokio::time::sleep(Duration::from_millis(75)).await;

        let service = runtime.service().clone();
        runtime.shutdown().await;

        assert_eq!(service.last_height(), Some(12));
        assert_eq!(service.snapshot().total_blocks_seen, 3);
        assert!(service.cycles_completed() >= 3);
    }
}
