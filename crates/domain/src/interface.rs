use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// The two wireless roles the appliance drives at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceRole {
    AccessPoint,
    Station,
}

impl InterfaceRole {
    pub const ALL: [InterfaceRole; 2] = [InterfaceRole::AccessPoint, InterfaceRole::Station];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceRole::AccessPoint => "access_point",
            InterfaceRole::Station => "station",
        }
    }
}

impl fmt::Display for InterfaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceRole::AccessPoint => write!(f, "AP"),
            InterfaceRole::Station => write!(f, "STA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    WrongPassword,
    NetworkNotFound,
    Timeout,
    Radio(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::WrongPassword => write!(f, "wrong password"),
            FailureReason::NetworkNotFound => write!(f, "network not found"),
            FailureReason::Timeout => write!(f, "timed out"),
            FailureReason::Radio(msg) => write!(f, "{}", msg),
        }
    }
}

/// Lifecycle state of one interface role.
///
/// `Down → Activating → {Connected | Failed}`; `Connecting` is only entered by
/// a station join. `Idle` is a station radio that is powered but deliberately
/// not associated ("provision later").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InterfaceState {
    Down,
    Activating,
    Idle,
    Connecting { target_ssid: String },
    Connected,
    Failed { reason: FailureReason },
}

impl InterfaceState {
    pub fn is_connected(&self) -> bool {
        matches!(self, InterfaceState::Connected)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, InterfaceState::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            InterfaceState::Down => "down",
            InterfaceState::Activating => "activating",
            InterfaceState::Idle => "idle",
            InterfaceState::Connecting { .. } => "connecting",
            InterfaceState::Connected => "connected",
            InterfaceState::Failed { .. } => "failed",
        }
    }
}

/// Raw association status as reported by the station radio on each poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Idle,
    Connecting,
    GotIp,
    WrongPassword,
    NoApFound,
    ConnectFailed,
}

impl LinkStatus {
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            LinkStatus::WrongPassword | LinkStatus::NoApFound | LinkStatus::ConnectFailed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    Open,
    #[default]
    Wpa2Psk,
}

/// A single entry of a radio scan. Several entries may share an SSID when
/// more than one access point broadcasts the same network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedNetwork {
    pub ssid: String,
    pub rssi: i8,
    pub channel: u8,
}

impl ScannedNetwork {
    pub fn new(ssid: impl Into<String>, rssi: i8, channel: u8) -> Self {
        Self {
            ssid: ssid.into(),
            rssi,
            channel,
        }
    }
}

/// Point-in-time view of one role, suitable for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceStatus {
    pub role: InterfaceRole,
    pub state: InterfaceState,
    pub ssid: Option<String>,
    pub ip: Option<Ipv4Addr>,
}

/// Fixed addressing applied to the station before it associates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationIpConfig {
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub dns: Ipv4Addr,
}

/// Settings applied to the access point radio on start.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessPointSettings {
    pub ssid: String,
    pub password: String,
    pub auth_mode: AuthMode,
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub channel: u8,
}

impl fmt::Debug for AccessPointSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessPointSettings")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("auth_mode", &self.auth_mode)
            .field("address", &self.address)
            .field("netmask", &self.netmask)
            .field("channel", &self.channel)
            .finish()
    }
}
