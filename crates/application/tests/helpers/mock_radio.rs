#![allow(dead_code)]

use async_trait::async_trait;
use captive_portal_application::ports::WirelessRadio;
use captive_portal_application::services::InterfaceTimings;
use captive_portal_domain::{
    AccessPointSettings, DomainError, InterfaceRole, LinkStatus, ScannedNetwork, StationIpConfig,
};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn fast_timings() -> InterfaceTimings {
    InterfaceTimings {
        activation_timeout: Duration::from_millis(50),
        connect_timeout: Duration::from_millis(300),
        poll_interval: Duration::from_millis(5),
    }
}

#[derive(Clone)]
struct MockNetwork {
    password: String,
    polls_to_connect: u32,
    address: Ipv4Addr,
}

#[derive(Default)]
struct Link {
    target: Option<(String, String)>,
    polls_remaining: u32,
    ip: Option<Ipv4Addr>,
}

pub struct MockRadio {
    ap_active: AtomicBool,
    sta_active: AtomicBool,
    ap_refuses: AtomicBool,
    scan_should_fail: AtomicBool,
    networks: Mutex<HashMap<String, MockNetwork>>,
    scan_results: Mutex<Vec<ScannedNetwork>>,
    link: Mutex<Link>,
    ap_settings: Mutex<Option<AccessPointSettings>>,
    station_ip: Mutex<Option<StationIpConfig>>,
    begin_connect_calls: AtomicU64,
    disconnect_calls: AtomicU64,
    scan_calls: AtomicU64,
}

impl MockRadio {
    pub fn new() -> Self {
        Self {
            ap_active: AtomicBool::new(false),
            sta_active: AtomicBool::new(false),
            ap_refuses: AtomicBool::new(false),
            scan_should_fail: AtomicBool::new(false),
            networks: Mutex::new(HashMap::new()),
            scan_results: Mutex::new(Vec::new()),
            link: Mutex::new(Link::default()),
            ap_settings: Mutex::new(None),
            station_ip: Mutex::new(None),
            begin_connect_calls: AtomicU64::new(0),
            disconnect_calls: AtomicU64::new(0),
            scan_calls: AtomicU64::new(0),
        }
    }

    pub fn with_network(self, ssid: &str, password: &str, polls_to_connect: u32, address: Ipv4Addr) -> Self {
        self.networks.lock().unwrap().insert(
            ssid.to_string(),
            MockNetwork {
                password: password.to_string(),
                polls_to_connect,
                address,
            },
        );
        self
    }

    pub fn with_scan_results(self, results: Vec<ScannedNetwork>) -> Self {
        *self.scan_results.lock().unwrap() = results;
        self
    }

    pub fn set_ap_refuses(&self, refuses: bool) {
        self.ap_refuses.store(refuses, Ordering::SeqCst);
    }

    pub fn set_scan_should_fail(&self, fail: bool) {
        self.scan_should_fail.store(fail, Ordering::SeqCst);
    }

    /// Simulates the access point radio dropping out on its own.
    pub fn drop_access_point(&self) {
        self.ap_active.store(false, Ordering::SeqCst);
    }

    /// Simulates the upstream network going away.
    pub fn drop_station_link(&self) {
        *self.link.lock().unwrap() = Link::default();
    }

    pub fn begin_connect_calls(&self) -> u64 {
        self.begin_connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> u64 {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    /// True while an association target is set on the station.
    pub fn is_associating(&self) -> bool {
        self.link.lock().unwrap().target.is_some()
    }

    pub fn scan_calls(&self) -> u64 {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn station_ip(&self) -> Option<StationIpConfig> {
        *self.station_ip.lock().unwrap()
    }

    pub fn ap_settings(&self) -> Option<AccessPointSettings> {
        self.ap_settings.lock().unwrap().clone()
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WirelessRadio for MockRadio {
    async fn set_active(&self, role: InterfaceRole, active: bool) -> Result<(), DomainError> {
        match role {
            InterfaceRole::AccessPoint => {
                let refuses = self.ap_refuses.load(Ordering::SeqCst);
                self.ap_active.store(active && !refuses, Ordering::SeqCst);
            }
            InterfaceRole::Station => {
                self.sta_active.store(active, Ordering::SeqCst);
                if !active {
                    *self.link.lock().unwrap() = Link::default();
                }
            }
        }
        Ok(())
    }

    async fn is_active(&self, role: InterfaceRole) -> bool {
        match role {
            InterfaceRole::AccessPoint => self.ap_active.load(Ordering::SeqCst),
            InterfaceRole::Station => self.sta_active.load(Ordering::SeqCst),
        }
    }

    async fn configure_access_point(&self, settings: &AccessPointSettings) -> Result<(), DomainError> {
        *self.ap_settings.lock().unwrap() = Some(settings.clone());
        Ok(())
    }

    async fn configure_station_ip(&self, ip: &StationIpConfig) -> Result<(), DomainError> {
        *self.station_ip.lock().unwrap() = Some(*ip);
        Ok(())
    }

    async fn begin_connect(&self, ssid: &str, password: &str) -> Result<(), DomainError> {
        self.begin_connect_calls.fetch_add(1, Ordering::SeqCst);
        let polls = self
            .networks
            .lock()
            .unwrap()
            .get(ssid)
            .map(|n| n.polls_to_connect)
            .unwrap_or(0);
        *self.link.lock().unwrap() = Link {
            target: Some((ssid.to_string(), password.to_string())),
            polls_remaining: polls,
            ip: None,
        };
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), DomainError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        *self.link.lock().unwrap() = Link::default();
        Ok(())
    }

    async fn link_status(&self) -> LinkStatus {
        let mut link = self.link.lock().unwrap();
        let Some((ssid, password)) = link.target.clone() else {
            return LinkStatus::Idle;
        };
        let network = self.networks.lock().unwrap().get(&ssid).cloned();
        match network {
            None => LinkStatus::NoApFound,
            Some(n) if n.password != password => LinkStatus::WrongPassword,
            Some(n) => {
                if link.polls_remaining > 0 {
                    link.polls_remaining -= 1;
                    LinkStatus::Connecting
                } else {
                    link.ip = Some(n.address);
                    LinkStatus::GotIp
                }
            }
        }
    }

    async fn scan(&self) -> Result<Vec<ScannedNetwork>, DomainError> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if self.scan_should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::Radio("scan hardware error".to_string()));
        }
        Ok(self.scan_results.lock().unwrap().clone())
    }

    async fn ip_address(&self, role: InterfaceRole) -> Option<Ipv4Addr> {
        match role {
            InterfaceRole::AccessPoint => self
                .ap_settings
                .lock()
                .unwrap()
                .as_ref()
                .map(|s| s.address),
            InterfaceRole::Station => self.link.lock().unwrap().ip,
        }
    }
}
