use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use super::errors::{parse_ipv4, ConfigError};
use crate::interface::AuthMode;

#[derive(Clone, Deserialize, Serialize)]
pub struct AccessPointConfig {
    #[serde(default = "default_ssid")]
    pub ssid: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default)]
    pub auth_mode: AuthMode,

    /// Address of the appliance on its own network.
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_netmask")]
    pub netmask: String,

    #[serde(default = "default_channel")]
    pub channel: u8,

    /// Address every DNS answer points at.
    #[serde(default = "default_address")]
    pub portal_ip: String,
}

impl AccessPointConfig {
    pub fn address(&self) -> Result<Ipv4Addr, ConfigError> {
        parse_ipv4("access_point.address", &self.address)
    }

    pub fn netmask(&self) -> Result<Ipv4Addr, ConfigError> {
        parse_ipv4("access_point.netmask", &self.netmask)
    }

    pub fn portal_ip(&self) -> Result<Ipv4Addr, ConfigError> {
        parse_ipv4("access_point.portal_ip", &self.portal_ip)
    }
}

impl Default for AccessPointConfig {
    fn default() -> Self {
        Self {
            ssid: default_ssid(),
            password: default_password(),
            auth_mode: AuthMode::default(),
            address: default_address(),
            netmask: default_netmask(),
            channel: default_channel(),
            portal_ip: default_address(),
        }
    }
}

impl std::fmt::Debug for AccessPointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessPointConfig")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("auth_mode", &self.auth_mode)
            .field("address", &self.address)
            .field("netmask", &self.netmask)
            .field("channel", &self.channel)
            .field("portal_ip", &self.portal_ip)
            .finish()
    }
}

fn default_ssid() -> String {
    "ESP32_Captive_Portal".to_string()
}

fn default_password() -> String {
    "12345678".to_string()
}

fn default_address() -> String {
    "192.168.4.1".to_string()
}

fn default_netmask() -> String {
    "255.255.255.0".to_string()
}

fn default_channel() -> u8 {
    6
}
