pub mod health_check;
pub mod runner;
pub mod watchdog_feed;

pub use health_check::HealthCheckJob;
pub use runner::{JobHandle, JobRunner};
pub use watchdog_feed::WatchdogFeedJob;
