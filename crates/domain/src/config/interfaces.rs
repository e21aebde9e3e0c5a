use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InterfacesConfig {
    /// How long the access point radio may take to report active.
    #[serde(default = "default_activation_timeout_ms")]
    pub activation_timeout_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_health_check_interval_secs")]
    pub health_check_interval_secs: u64,
}

impl Default for InterfacesConfig {
    fn default() -> Self {
        Self {
            activation_timeout_ms: default_activation_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            health_check_interval_secs: default_health_check_interval_secs(),
        }
    }
}

fn default_activation_timeout_ms() -> u64 {
    20_000
}

fn default_connect_timeout_ms() -> u64 {
    20_000
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_health_check_interval_secs() -> u64 {
    10
}
