use crate::{HealthCheckJob, WatchdogFeedJob};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + Sync + 'static {
    const NAME: &'static str;
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty, $name:literal) => {
        impl SpawnableJob for $t {
            const NAME: &'static str = $name;

            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> JoinHandle<()> {
                self.start()
            }
        }
    };
}

impl_spawnable_job!(HealthCheckJob, "health-check");
impl_spawnable_job!(WatchdogFeedJob, "watchdog-feed");

/// A started background job, kept so shutdown can wait for it.
pub struct JobHandle {
    pub name: &'static str,
    pub handle: JoinHandle<()>,
}

fn spawn_job<J: SpawnableJob>(
    job: Option<J>,
    shutdown: &Option<CancellationToken>,
    handles: &mut Vec<JobHandle>,
) {
    if let Some(job) = job {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        handles.push(JobHandle {
            name: J::NAME,
            handle: Arc::new(job).start_job(),
        });
    }
}

pub struct JobRunner {
    health_check: Option<HealthCheckJob>,
    watchdog_feed: Option<WatchdogFeedJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            health_check: None,
            watchdog_feed: None,
            shutdown: None,
        }
    }

    pub fn with_health_check(mut self, job: HealthCheckJob) -> Self {
        self.health_check = Some(job);
        self
    }

    pub fn with_watchdog_feed(mut self, job: WatchdogFeedJob) -> Self {
        self.watchdog_feed = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub fn start(self) -> Vec<JobHandle> {
        info!("Starting background job runner");

        let mut handles = Vec::new();
        spawn_job(self.health_check, &self.shutdown, &mut handles);
        spawn_job(self.watchdog_feed, &self.shutdown, &mut handles);

        info!(count = handles.len(), "Background jobs started");
        handles
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
