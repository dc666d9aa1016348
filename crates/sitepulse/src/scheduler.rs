use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use crate::monitor::Monitor;

/// Default cadence between ticks
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Default number of concurrent per-site checks within a tick
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Drives periodic health checks across the registry.
///
/// Each tick takes a snapshot of the registry and fans the checks out
/// with a bounded worker limit. One site's slow or failing probe never
/// blocks or aborts another's; overlap for a single site is coalesced
/// inside [`Monitor::check_site`].
pub struct Scheduler {
    monitor: Arc<Monitor>,
    interval: Duration,
    concurrency: usize,
}

impl Scheduler {
    pub fn new(monitor: Arc<Monitor>, interval: Duration, concurrency: usize) -> Self {
        Self { monitor, interval, concurrency: concurrency.max(1) }
    }

    /// Spawn the periodic tick loop. The task runs for the lifetime of
    /// the process; dropping the handle does not stop it.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut timer = interval(self.interval);
            // A slow tick delays the next one instead of queueing bursts
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                timer.tick().await;
                self.run_tick().await;
            }
        })
    }

    /// Check every currently registered site once
    pub async fn run_tick(&self) {
        let sites = self.monitor.registry().list().await;
        debug!("running health checks for {} site(s)", sites.len());

        stream::iter(sites)
            .for_each_concurrent(self.concurrency, |site| {
                let monitor = self.monitor.clone();
                async move {
                    monitor.check_site(&site.id).await;
                }
            })
            .await;
    }
}
