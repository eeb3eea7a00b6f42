use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

use super::{EpgIngestor, RefreshOutcome};
use crate::epg::EpgStore;

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

pub fn create_shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel(1)
}

/// Runs the EPG refresh at start and then on a fixed interval.
///
/// The interval is anchored to when the scheduler started, not to the clock.
/// A refresh that overruns pushes the next tick back instead of triggering a
/// burst of catch-up refreshes.
pub struct EpgRefreshScheduler {
    ingestor: Arc<EpgIngestor>,
    store: EpgStore,
    refresh_interval: Duration,
}

impl EpgRefreshScheduler {
    pub fn new(ingestor: Arc<EpgIngestor>, store: EpgStore, refresh_interval: Duration) -> Self {
        Self {
            ingestor,
            store,
            refresh_interval,
        }
    }

    pub async fn start(self, mut shutdown_rx: ShutdownReceiver) {
        info!(
            "Starting EPG refresh scheduler (every {})",
            humantime::format_duration(self.refresh_interval)
        );

        let mut ticker = interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.ingestor.refresh(&self.store).await;
                    debug!("EPG refresh finished: {:?}", outcome);
                    if outcome == RefreshOutcome::Skipped {
                        // Nothing will change until restart
                        info!("EPG disabled; scheduler exiting");
                        break;
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("EPG refresh scheduler stopping");
                    break;
                }
            }
        }
    }
}
