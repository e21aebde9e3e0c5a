use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchdogConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_feed_interval_secs")]
    pub feed_interval_secs: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: default_timeout_secs(),
            feed_interval_secs: default_feed_interval_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_feed_interval_secs() -> u64 {
    5
}
