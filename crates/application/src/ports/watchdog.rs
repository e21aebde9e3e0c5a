use std::time::Duration;

/// Liveness monitor that restarts the appliance unless fed in time.
pub trait Watchdog: Send + Sync {
    fn feed(&self);

    fn timeout(&self) -> Duration;
}
