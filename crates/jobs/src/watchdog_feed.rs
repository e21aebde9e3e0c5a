use captive_portal_application::ports::Watchdog;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace};

pub struct WatchdogFeedJob {
    watchdog: Arc<dyn Watchdog>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl WatchdogFeedJob {
    pub fn new(watchdog: Arc<dyn Watchdog>) -> Self {
        let interval = watchdog.timeout() / 2;
        Self {
            watchdog,
            interval,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            timeout_ms = self.watchdog.timeout().as_millis() as u64,
            "Starting watchdog feed job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("WatchdogFeedJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        self.watchdog.feed();
                        trace!("Watchdog fed");
                    }
                }
            }
        })
    }
}
