use captive_portal_application::ports::Watchdog;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};

type StarvationAction = Box<dyn Fn() + Send + Sync>;

/// Watchdog backed by a dedicated OS thread, so it still fires when the async
/// runtime itself is wedged. On starvation it runs its action once; the
/// default action exits the process and leaves the restart to the supervisor.
pub struct SoftwareWatchdog {
    timeout: Duration,
    epoch: Instant,
    last_fed_ms: AtomicU64,
    disarmed: AtomicBool,
    fired: AtomicBool,
    on_starve: StarvationAction,
}

impl SoftwareWatchdog {
    pub fn start(timeout: Duration) -> Arc<Self> {
        Self::start_with_action(
            timeout,
            Box::new(|| {
                error!("Watchdog starved, exiting");
                std::process::exit(70);
            }),
        )
    }

    pub fn start_with_action(timeout: Duration, on_starve: StarvationAction) -> Arc<Self> {
        let watchdog = Arc::new(Self {
            timeout,
            epoch: Instant::now(),
            last_fed_ms: AtomicU64::new(0),
            disarmed: AtomicBool::new(false),
            fired: AtomicBool::new(false),
            on_starve,
        });

        let monitor = Arc::clone(&watchdog);
        let check_every = (timeout / 4).max(Duration::from_millis(1));
        thread::Builder::new()
            .name("watchdog".to_string())
            .spawn(move || monitor.monitor(check_every))
            .map(|_| ())
            .unwrap_or_else(|e| error!(error = %e, "Could not spawn watchdog thread"));

        info!(timeout_ms = timeout.as_millis() as u64, "Watchdog armed");
        watchdog
    }

    fn monitor(&self, check_every: Duration) {
        while !self.disarmed.load(Ordering::Acquire) {
            thread::sleep(check_every);
            let now_ms = self.epoch.elapsed().as_millis() as u64;
            let last = self.last_fed_ms.load(Ordering::Acquire);
            if now_ms.saturating_sub(last) > self.timeout.as_millis() as u64 {
                if self.disarmed.load(Ordering::Acquire) {
                    break;
                }
                self.fired.store(true, Ordering::Release);
                (self.on_starve)();
                break;
            }
        }
    }

    /// Stops monitoring. Called on orderly shutdown so a slow drain is not
    /// mistaken for a hang.
    pub fn disarm(&self) {
        self.disarmed.store(true, Ordering::Release);
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

impl Watchdog for SoftwareWatchdog {
    fn feed(&self) {
        let now_ms = self.epoch.elapsed().as_millis() as u64;
        self.last_fed_ms.store(now_ms, Ordering::Release);
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
