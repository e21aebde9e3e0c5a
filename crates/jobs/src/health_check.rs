use captive_portal_application::services::{HealthAction, HealthReport, InterfaceManager};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Periodically restores interfaces that dropped out.
pub struct HealthCheckJob {
    interfaces: Arc<InterfaceManager>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl HealthCheckJob {
    pub fn new(interfaces: Arc<InterfaceManager>) -> Self {
        Self {
            interfaces,
            interval: Duration::from_secs(10),
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
            "Starting interface health check job"
        );

        tokio::spawn(async move {
            // Interfaces were just brought up; the first pass waits a full period.
            let mut interval = interval_at(Instant::now() + self.interval, self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("HealthCheckJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        tokio::select! {
                            _ = self.shutdown.cancelled() => {
                                info!("HealthCheckJob: shutting down mid-check");
                                break;
                            }
                            report = self.interfaces.run_health_check() => log_report(&report),
                        }
                    }
                }
            }
        })
    }
}

fn log_report(report: &HealthReport) {
    for (role, action) in [("AP", &report.access_point), ("STA", &report.station)] {
        match action {
            HealthAction::RestartFailed(reason) | HealthAction::ReconnectFailed(reason) => {
                warn!(role, reason = %reason, "Health check could not restore interface");
            }
            HealthAction::Restarted => info!(role, "Health check restarted interface"),
            HealthAction::Reconnected(ip) => info!(role, ip = %ip, "Health check reconnected interface"),
            other => debug!(role, action = ?other, "Health check"),
        }
    }
}
