use serde::{Deserialize, Serialize};

/// Networks visible to the simulated radio backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RadioConfig {
    #[serde(default = "default_networks")]
    pub networks: Vec<SimulatedNetworkConfig>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct SimulatedNetworkConfig {
    pub ssid: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_rssi")]
    pub rssi: i8,

    #[serde(default = "default_channel")]
    pub channel: u8,

    /// Status polls that report "connecting" before the link comes up.
    #[serde(default = "default_polls_to_connect")]
    pub polls_to_connect: u32,

    /// Address handed to the station once associated.
    pub address: String,
}

impl std::fmt::Debug for SimulatedNetworkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedNetworkConfig")
            .field("ssid", &self.ssid)
            .field("rssi", &self.rssi)
            .field("channel", &self.channel)
            .field("polls_to_connect", &self.polls_to_connect)
            .field("address", &self.address)
            .finish()
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            networks: default_networks(),
        }
    }
}

fn default_networks() -> Vec<SimulatedNetworkConfig> {
    vec![
        SimulatedNetworkConfig {
            ssid: "HomeNet".to_string(),
            password: "correct-horse".to_string(),
            rssi: -48,
            channel: 1,
            polls_to_connect: 2,
            address: "10.0.0.23".to_string(),
        },
        SimulatedNetworkConfig {
            ssid: "CoffeeShop".to_string(),
            password: String::new(),
            rssi: -71,
            channel: 11,
            polls_to_connect: 3,
            address: "172.16.5.40".to_string(),
        },
    ]
}

fn default_rssi() -> i8 {
    -60
}

fn default_channel() -> u8 {
    1
}

fn default_polls_to_connect() -> u32 {
    2
}
