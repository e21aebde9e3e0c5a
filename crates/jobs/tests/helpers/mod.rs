#![allow(dead_code)]

use async_trait::async_trait;
use captive_portal_application::ports::{Watchdog, WirelessRadio};
use captive_portal_application::services::InterfaceTimings;
use captive_portal_domain::{
    AccessPointSettings, AuthMode, DomainError, InterfaceRole, LinkStatus, ScannedNetwork,
    StationIpConfig,
};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

pub fn fast_timings() -> InterfaceTimings {
    InterfaceTimings {
        activation_timeout: Duration::from_millis(50),
        connect_timeout: Duration::from_millis(100),
        poll_interval: Duration::from_millis(5),
    }
}

pub fn ap_settings() -> AccessPointSettings {
    AccessPointSettings {
        ssid: "ESP32_Captive_Portal".to_string(),
        password: "12345678".to_string(),
        auth_mode: AuthMode::Wpa2Psk,
        address: Ipv4Addr::new(192, 168, 4, 1),
        netmask: Ipv4Addr::new(255, 255, 255, 0),
        channel: 6,
    }
}

pub const UPSTREAM_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 23);

/// Radio whose access point can be knocked offline. The station only links
/// while the upstream network is reachable.
pub struct FlakyApRadio {
    ap_active: AtomicBool,
    activations: AtomicU64,
    upstream_reachable: AtomicBool,
    disconnects: AtomicU64,
}

impl FlakyApRadio {
    pub fn new() -> Self {
        Self {
            ap_active: AtomicBool::new(false),
            activations: AtomicU64::new(0),
            upstream_reachable: AtomicBool::new(false),
            disconnects: AtomicU64::new(0),
        }
    }

    pub fn set_upstream_reachable(&self, reachable: bool) {
        self.upstream_reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn disconnects(&self) -> u64 {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn knock_offline(&self) {
        self.ap_active.store(false, Ordering::SeqCst);
    }

    pub fn activations(&self) -> u64 {
        self.activations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WirelessRadio for FlakyApRadio {
    async fn set_active(&self, role: InterfaceRole, active: bool) -> Result<(), DomainError> {
        if role == InterfaceRole::AccessPoint {
            if active {
                self.activations.fetch_add(1, Ordering::SeqCst);
            }
            self.ap_active.store(active, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn is_active(&self, role: InterfaceRole) -> bool {
        role == InterfaceRole::AccessPoint && self.ap_active.load(Ordering::SeqCst)
    }

    async fn configure_access_point(&self, _settings: &AccessPointSettings) -> Result<(), DomainError> {
        Ok(())
    }

    async fn configure_station_ip(&self, _ip: &StationIpConfig) -> Result<(), DomainError> {
        Ok(())
    }

    async fn begin_connect(&self, _ssid: &str, _password: &str) -> Result<(), DomainError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), DomainError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn link_status(&self) -> LinkStatus {
        if self.upstream_reachable.load(Ordering::SeqCst) {
            LinkStatus::GotIp
        } else {
            LinkStatus::Connecting
        }
    }

    async fn scan(&self) -> Result<Vec<ScannedNetwork>, DomainError> {
        Ok(Vec::new())
    }

    async fn ip_address(&self, role: InterfaceRole) -> Option<Ipv4Addr> {
        match role {
            InterfaceRole::Station if self.upstream_reachable.load(Ordering::SeqCst) => {
                Some(UPSTREAM_IP)
            }
            _ => None,
        }
    }
}

pub struct CountingWatchdog {
    feeds: AtomicU64,
    timeout: Duration,
}

impl CountingWatchdog {
    pub fn new(timeout: Duration) -> Self {
        Self {
            feeds: AtomicU64::new(0),
            timeout,
        }
    }

    pub fn feeds(&self) -> u64 {
        self.feeds.load(Ordering::SeqCst)
    }
}

impl Watchdog for CountingWatchdog {
    fn feed(&self) {
        self.feeds.fetch_add(1, Ordering::SeqCst);
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
