use serde::{Deserialize, Serialize};

use super::errors::{parse_ipv4, ConfigError};
use crate::credentials::Credentials;
use crate::interface::StationIpConfig;

/// Upstream network to join at boot. An empty SSID leaves the station idle
/// until credentials arrive through the portal.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct StationConfig {
    #[serde(default)]
    pub ssid: String,

    #[serde(default)]
    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_ip: Option<StaticIpConfig>,
}

impl StationConfig {
    pub fn credentials(&self) -> Option<Credentials> {
        if self.ssid.is_empty() {
            None
        } else {
            Some(Credentials::new(self.ssid.clone(), self.password.clone()))
        }
    }

    pub fn ip_config(&self) -> Result<Option<StationIpConfig>, ConfigError> {
        self.static_ip.as_ref().map(StaticIpConfig::to_ip_config).transpose()
    }
}

impl std::fmt::Debug for StationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationConfig")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("static_ip", &self.static_ip)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticIpConfig {
    pub address: String,
    pub netmask: String,
    pub gateway: String,
    pub dns: String,
}

impl StaticIpConfig {
    pub fn to_ip_config(&self) -> Result<StationIpConfig, ConfigError> {
        Ok(StationIpConfig {
            address: parse_ipv4("station.static_ip.address", &self.address)?,
            netmask: parse_ipv4("station.static_ip.netmask", &self.netmask)?,
            gateway: parse_ipv4("station.static_ip.gateway", &self.gateway)?,
            dns: parse_ipv4("station.static_ip.dns", &self.dns)?,
        })
    }
}
