pub mod watchdog;

pub use watchdog::SoftwareWatchdog;
