use async_trait::async_trait;
use captive_portal_domain::{
    AccessPointSettings, DomainError, InterfaceRole, LinkStatus, ScannedNetwork, StationIpConfig,
};
use std::net::Ipv4Addr;

/// Driver for the device's wireless hardware. One radio serves both roles.
///
/// Operations are non-blocking requests: `begin_connect` only starts the
/// association, progress is observed through `link_status`.
#[async_trait]
pub trait WirelessRadio: Send + Sync {
    /// Power a role's interface up or down.
    async fn set_active(&self, role: InterfaceRole, active: bool) -> Result<(), DomainError>;

    async fn is_active(&self, role: InterfaceRole) -> bool;

    async fn configure_access_point(&self, settings: &AccessPointSettings)
        -> Result<(), DomainError>;

    async fn configure_station_ip(&self, ip: &StationIpConfig) -> Result<(), DomainError>;

    async fn begin_connect(&self, ssid: &str, password: &str) -> Result<(), DomainError>;

    async fn disconnect(&self) -> Result<(), DomainError>;

    async fn link_status(&self) -> LinkStatus;

    async fn scan(&self) -> Result<Vec<ScannedNetwork>, DomainError>;

    async fn ip_address(&self, role: InterfaceRole) -> Option<Ipv4Addr>;
}
