use async_trait::async_trait;
use captive_portal_application::ports::WirelessRadio;
use captive_portal_domain::config::RadioConfig;
use captive_portal_domain::{
    AccessPointSettings, DomainError, InterfaceRole, LinkStatus, ScannedNetwork, StationIpConfig,
};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// A network the simulated station can see and join.
#[derive(Clone)]
pub struct SimulatedNetwork {
    pub ssid: String,
    pub password: String,
    pub rssi: i8,
    pub channel: u8,
    /// Status polls answered with `Connecting` before the link comes up.
    pub polls_to_connect: u32,
    pub address: Ipv4Addr,
}

impl SimulatedNetwork {
    pub fn new(ssid: &str, password: &str, address: Ipv4Addr) -> Self {
        Self {
            ssid: ssid.to_string(),
            password: password.to_string(),
            rssi: -55,
            channel: 1,
            polls_to_connect: 2,
            address,
        }
    }

    pub fn with_polls(mut self, polls_to_connect: u32) -> Self {
        self.polls_to_connect = polls_to_connect;
        self
    }

    pub fn with_signal(mut self, rssi: i8, channel: u8) -> Self {
        self.rssi = rssi;
        self.channel = channel;
        self
    }
}

impl std::fmt::Debug for SimulatedNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedNetwork")
            .field("ssid", &self.ssid)
            .field("polls_to_connect", &self.polls_to_connect)
            .field("address", &self.address)
            .finish()
    }
}

#[derive(Debug, Default)]
struct StationLink {
    target: Option<(String, String)>,
    polls_remaining: u32,
    address: Option<Ipv4Addr>,
}

#[derive(Debug, Default)]
struct RadioState {
    ap_active: bool,
    sta_active: bool,
    ap_settings: Option<AccessPointSettings>,
    station_ip: Option<StationIpConfig>,
    link: StationLink,
}

/// In-memory radio that stands in for real hardware. Every network listed
/// appears in scans; listing an SSID twice models two access points
/// broadcasting the same network.
pub struct SimulatedRadio {
    networks: Vec<SimulatedNetwork>,
    state: RwLock<RadioState>,
    refuse_ap: AtomicBool,
    fail_scans: AtomicBool,
    connect_attempts: AtomicU64,
}

impl SimulatedRadio {
    pub fn new(networks: Vec<SimulatedNetwork>) -> Self {
        Self {
            networks,
            state: RwLock::new(RadioState::default()),
            refuse_ap: AtomicBool::new(false),
            fail_scans: AtomicBool::new(false),
            connect_attempts: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &RadioConfig) -> Result<Self, DomainError> {
        let networks = config
            .networks
            .iter()
            .map(|n| {
                let address = n.address.parse().map_err(|_| {
                    DomainError::InvalidIpAddress(format!("{} (network {})", n.address, n.ssid))
                })?;
                Ok(SimulatedNetwork {
                    ssid: n.ssid.clone(),
                    password: n.password.clone(),
                    rssi: n.rssi,
                    channel: n.channel,
                    polls_to_connect: n.polls_to_connect,
                    address,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok(Self::new(networks))
    }

    /// Access point activation requests succeed but the radio never reports active.
    pub fn refuse_access_point(&self, refuse: bool) {
        self.refuse_ap.store(refuse, Ordering::SeqCst);
    }

    pub fn fail_scans(&self, fail: bool) {
        self.fail_scans.store(fail, Ordering::SeqCst);
    }

    pub async fn drop_access_point(&self) {
        self.state.write().await.ap_active = false;
    }

    pub async fn drop_station_link(&self) {
        self.state.write().await.link = StationLink::default();
    }

    pub fn connect_attempts(&self) -> u64 {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    pub async fn station_ip_config(&self) -> Option<StationIpConfig> {
        self.state.read().await.station_ip
    }

    fn network(&self, ssid: &str) -> Option<&SimulatedNetwork> {
        self.networks.iter().find(|n| n.ssid == ssid)
    }
}

#[async_trait]
impl WirelessRadio for SimulatedRadio {
    async fn set_active(&self, role: InterfaceRole, active: bool) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match role {
            InterfaceRole::AccessPoint => {
                state.ap_active = active && !self.refuse_ap.load(Ordering::SeqCst);
            }
            InterfaceRole::Station => {
                state.sta_active = active;
                if !active {
                    state.link = StationLink::default();
                }
            }
        }
        debug!(role = %role, active, "Simulated radio power change");
        Ok(())
    }

    async fn is_active(&self, role: InterfaceRole) -> bool {
        let state = self.state.read().await;
        match role {
            InterfaceRole::AccessPoint => state.ap_active,
            InterfaceRole::Station => state.sta_active,
        }
    }

    async fn configure_access_point(
        &self,
        settings: &AccessPointSettings,
    ) -> Result<(), DomainError> {
        self.state.write().await.ap_settings = Some(settings.clone());
        Ok(())
    }

    async fn configure_station_ip(&self, ip: &StationIpConfig) -> Result<(), DomainError> {
        self.state.write().await.station_ip = Some(*ip);
        Ok(())
    }

    async fn begin_connect(&self, ssid: &str, password: &str) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.sta_active {
            return Err(DomainError::InterfaceNotStarted(InterfaceRole::Station));
        }
        self.connect_attempts.fetch_add(1, Ordering::SeqCst);
        state.link = StationLink {
            target: Some((ssid.to_string(), password.to_string())),
            polls_remaining: self.network(ssid).map(|n| n.polls_to_connect).unwrap_or(0),
            address: None,
        };
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), DomainError> {
        self.state.write().await.link = StationLink::default();
        Ok(())
    }

    async fn link_status(&self) -> LinkStatus {
        let mut state = self.state.write().await;
        let Some((ssid, password)) = state.link.target.clone() else {
            return LinkStatus::Idle;
        };
        let Some(network) = self.network(&ssid) else {
            return LinkStatus::NoApFound;
        };
        if network.password != password {
            return LinkStatus::WrongPassword;
        }
        if state.link.polls_remaining > 0 {
            state.link.polls_remaining -= 1;
            return LinkStatus::Connecting;
        }
        let address = state
            .station_ip
            .map(|ip| ip.address)
            .unwrap_or(network.address);
        state.link.address = Some(address);
        LinkStatus::GotIp
    }

    async fn scan(&self) -> Result<Vec<ScannedNetwork>, DomainError> {
        if !self.state.read().await.sta_active {
            return Err(DomainError::InterfaceNotStarted(InterfaceRole::Station));
        }
        if self.fail_scans.load(Ordering::SeqCst) {
            return Err(DomainError::ScanFailed("simulated scan failure".to_string()));
        }
        Ok(self
            .networks
            .iter()
            .map(|n| ScannedNetwork::new(n.ssid.clone(), n.rssi, n.channel))
            .collect())
    }

    async fn ip_address(&self, role: InterfaceRole) -> Option<Ipv4Addr> {
        let state = self.state.read().await;
        match role {
            InterfaceRole::AccessPoint if state.ap_active => {
                state.ap_settings.as_ref().map(|s| s.address)
            }
            InterfaceRole::AccessPoint => None,
            InterfaceRole::Station => state.link.address,
        }
    }
}
