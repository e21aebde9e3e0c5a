use captive_portal_domain::config::InterfacesConfig;
use captive_portal_domain::credentials::validate_passphrase;
use captive_portal_domain::{
    AccessPointSettings, Credentials, DomainError, FailureReason, InterfaceRole, InterfaceState,
    InterfaceStatus, LinkStatus, StationIpConfig,
};
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, instrument, warn};

use super::connect_gate::{AutoReconnect, AutoReconnectGuard, ConnectGate, ConnectPermit};
use crate::ports::WirelessRadio;

#[derive(Debug, Clone, Copy)]
pub struct InterfaceTimings {
    pub activation_timeout: Duration,
    pub connect_timeout: Duration,
    pub poll_interval: Duration,
}

impl InterfaceTimings {
    pub fn from_config(config: &InterfacesConfig) -> Self {
        Self {
            activation_timeout: Duration::from_millis(config.activation_timeout_ms),
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

impl Default for InterfaceTimings {
    fn default() -> Self {
        Self::from_config(&InterfacesConfig::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StationSettings {
    /// `None` activates the radio without joining anything.
    pub credentials: Option<Credentials>,
    pub ip: Option<StationIpConfig>,
}

#[derive(Debug, Clone)]
pub enum RoleConfig {
    AccessPoint(AccessPointSettings),
    Station(StationSettings),
}

impl RoleConfig {
    pub fn role(&self) -> InterfaceRole {
        match self {
            RoleConfig::AccessPoint(_) => InterfaceRole::AccessPoint,
            RoleConfig::Station(_) => InterfaceRole::Station,
        }
    }
}

/// What one health-check pass did for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthAction {
    NotManaged,
    Healthy,
    Restarted,
    RestartFailed(String),
    Reconnected(Ipv4Addr),
    ReconnectFailed(String),
    SkippedConnectInProgress,
    SkippedSuppressed,
    SkippedNoCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub access_point: HealthAction,
    pub station: HealthAction,
}

#[derive(Debug)]
struct RoleSlot {
    /// Started by the appliance and watched by the health check.
    managed: bool,
    state: InterfaceState,
    ssid: Option<String>,
}

impl RoleSlot {
    fn down() -> Self {
        Self {
            managed: false,
            state: InterfaceState::Down,
            ssid: None,
        }
    }
}

#[derive(Debug, Default)]
struct StationMemory {
    configured: Option<Credentials>,
    last_successful: Option<Credentials>,
}

/// In-flight station connect. Dropping it unsettled means the connecting
/// future was cancelled mid-association.
struct ConnectAttempt {
    station: Arc<RwLock<RoleSlot>>,
    radio: Arc<dyn WirelessRadio>,
    ssid: String,
    permit: Option<ConnectPermit>,
    settled: bool,
}

impl ConnectAttempt {
    fn abandoned_state() -> InterfaceState {
        InterfaceState::Failed {
            reason: FailureReason::Timeout,
        }
    }
}

impl Drop for ConnectAttempt {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(ssid = %self.ssid, "Connect abandoned before it settled");

        let recorded = match self.station.try_write() {
            Ok(mut slot) => {
                slot.state = Self::abandoned_state();
                slot.ssid = None;
                true
            }
            Err(_) => false,
        };

        // The gate stays closed until the radio is told to stop, so a new
        // connect cannot be torn down by this cleanup.
        let permit = self.permit.take();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let station = Arc::clone(&self.station);
        let radio = Arc::clone(&self.radio);
        runtime.spawn(async move {
            if !recorded {
                let mut slot = station.write().await;
                slot.state = Self::abandoned_state();
                slot.ssid = None;
            }
            if let Err(e) = radio.disconnect().await {
                debug!(error = %e, "Disconnect after abandoned connect failed");
            }
            drop(permit);
        });
    }
}

/// Owns both wireless roles and is the only component that talks to the radio.
///
/// Station connects are serialized by a [`ConnectGate`]: whoever holds the
/// permit (a user request, boot-time join or health-check reconnect) is the
/// only caller issuing association commands.
pub struct InterfaceManager {
    radio: Arc<dyn WirelessRadio>,
    timings: InterfaceTimings,
    access_point: RwLock<RoleSlot>,
    station: Arc<RwLock<RoleSlot>>,
    ap_settings: RwLock<Option<AccessPointSettings>>,
    station_memory: RwLock<StationMemory>,
    gate: Arc<ConnectGate>,
    auto_reconnect: Arc<AutoReconnect>,
}

impl InterfaceManager {
    pub fn new(radio: Arc<dyn WirelessRadio>, timings: InterfaceTimings) -> Self {
        Self {
            radio,
            timings,
            access_point: RwLock::new(RoleSlot::down()),
            station: Arc::new(RwLock::new(RoleSlot::down())),
            ap_settings: RwLock::new(None),
            station_memory: RwLock::new(StationMemory::default()),
            gate: ConnectGate::new(),
            auto_reconnect: AutoReconnect::new(),
        }
    }

    fn slot(&self, role: InterfaceRole) -> &RwLock<RoleSlot> {
        match role {
            InterfaceRole::AccessPoint => &self.access_point,
            InterfaceRole::Station => self.station.as_ref(),
        }
    }

    async fn set_state(&self, role: InterfaceRole, state: InterfaceState, ssid: Option<String>) {
        let mut slot = self.slot(role).write().await;
        debug!(role = %role, from = slot.state.label(), to = state.label(), "Interface state change");
        slot.state = state;
        slot.ssid = ssid;
    }

    #[instrument(skip(self, config), fields(role = %config.role()))]
    pub async fn start(&self, config: RoleConfig) -> Result<(), DomainError> {
        match config {
            RoleConfig::AccessPoint(settings) => self.start_access_point(settings).await,
            RoleConfig::Station(settings) => self.start_station(settings).await,
        }
    }

    async fn start_access_point(&self, settings: AccessPointSettings) -> Result<(), DomainError> {
        validate_passphrase(settings.auth_mode, &settings.password)?;

        {
            let mut slot = self.access_point.write().await;
            slot.managed = true;
            slot.state = InterfaceState::Activating;
        }
        *self.ap_settings.write().await = Some(settings.clone());

        match self.activate_access_point(&settings).await {
            Ok(()) => {
                self.set_state(
                    InterfaceRole::AccessPoint,
                    InterfaceState::Connected,
                    Some(settings.ssid.clone()),
                )
                .await;
                info!(
                    ssid = %settings.ssid,
                    address = %settings.address,
                    auth_mode = ?settings.auth_mode,
                    "Access point active"
                );
                Ok(())
            }
            Err(e) => {
                self.set_state(
                    InterfaceRole::AccessPoint,
                    InterfaceState::Failed {
                        reason: FailureReason::Radio(e.to_string()),
                    },
                    None,
                )
                .await;
                Err(e)
            }
        }
    }

    async fn activate_access_point(&self, settings: &AccessPointSettings) -> Result<(), DomainError> {
        self.radio.set_active(InterfaceRole::AccessPoint, true).await?;
        self.radio.configure_access_point(settings).await?;

        let deadline = Instant::now() + self.timings.activation_timeout;
        while !self.radio.is_active(InterfaceRole::AccessPoint).await {
            if Instant::now() >= deadline {
                return Err(DomainError::ActivationTimeout {
                    role: InterfaceRole::AccessPoint,
                    timeout_ms: self.timings.activation_timeout.as_millis() as u64,
                });
            }
            sleep(self.timings.poll_interval).await;
        }
        Ok(())
    }

    async fn start_station(&self, settings: StationSettings) -> Result<(), DomainError> {
        self.station_memory.write().await.configured = settings.credentials.clone();
        {
            let mut slot = self.station.write().await;
            slot.managed = true;
            slot.state = InterfaceState::Activating;
        }

        let activated = async {
            self.radio.set_active(InterfaceRole::Station, true).await?;
            if let Some(ip) = &settings.ip {
                self.radio.configure_station_ip(ip).await?;
                info!(address = %ip.address, gateway = %ip.gateway, "Static station address applied");
            }
            Ok::<(), DomainError>(())
        }
        .await;

        if let Err(e) = activated {
            self.set_state(
                InterfaceRole::Station,
                InterfaceState::Failed {
                    reason: FailureReason::Radio(e.to_string()),
                },
                None,
            )
            .await;
            return Err(e);
        }

        match settings.credentials {
            None => {
                self.set_state(InterfaceRole::Station, InterfaceState::Idle, None).await;
                info!("Station active, no upstream network configured");
                Ok(())
            }
            Some(creds) => {
                let permit = self
                    .gate
                    .try_acquire()
                    .ok_or(DomainError::ConnectInProgress)?;
                self.connect_with_permit(&creds, permit).await.map(|_| ())
            }
        }
    }

    /// Join an upstream network. Only valid for the station role; fails fast
    /// with `ConnectInProgress` when another connect holds the gate.
    #[instrument(skip(self, password))]
    pub async fn connect(
        &self,
        role: InterfaceRole,
        ssid: &str,
        password: &str,
    ) -> Result<Ipv4Addr, DomainError> {
        if role != InterfaceRole::Station {
            return Err(DomainError::UnsupportedRole(role));
        }

        let permit = self
            .gate
            .try_acquire()
            .ok_or(DomainError::ConnectInProgress)?;

        if !self.radio.is_active(InterfaceRole::Station).await {
            self.radio.set_active(InterfaceRole::Station, true).await?;
        }
        self.station.write().await.managed = true;

        let creds = Credentials::new(ssid, password);
        self.connect_with_permit(&creds, permit).await
    }

    /// Runs one association while holding `permit`. If the returned future is
    /// dropped before it settles, the station is marked failed and the radio
    /// disconnected before the gate opens again.
    async fn connect_with_permit(
        &self,
        creds: &Credentials,
        permit: ConnectPermit,
    ) -> Result<Ipv4Addr, DomainError> {
        let mut attempt = ConnectAttempt {
            station: Arc::clone(&self.station),
            radio: Arc::clone(&self.radio),
            ssid: creds.ssid.clone(),
            permit: Some(permit),
            settled: false,
        };
        let result = self.associate(creds).await;
        attempt.settled = true;
        result
    }

    async fn associate(&self, creds: &Credentials) -> Result<Ipv4Addr, DomainError> {
        let ssid = creds.ssid.clone();
        self.set_state(
            InterfaceRole::Station,
            InterfaceState::Connecting {
                target_ssid: ssid.clone(),
            },
            None,
        )
        .await;
        info!(ssid = %ssid, "Joining upstream network");

        if let Err(e) = self.radio.disconnect().await {
            debug!(error = %e, "Disconnect before join failed");
        }

        if let Err(e) = self.radio.begin_connect(&creds.ssid, &creds.password).await {
            warn!(ssid = %ssid, error = %e, "Radio refused to start association");
            self.fail_station(FailureReason::Radio(e.to_string())).await;
            return Err(DomainError::ConnectFailed {
                ssid,
                reason: e.to_string(),
            });
        }

        let deadline = Instant::now() + self.timings.connect_timeout;
        loop {
            match self.radio.link_status().await {
                LinkStatus::GotIp => {
                    if let Some(ip) = self.radio.ip_address(InterfaceRole::Station).await {
                        self.set_state(
                            InterfaceRole::Station,
                            InterfaceState::Connected,
                            Some(ssid.clone()),
                        )
                        .await;
                        self.station_memory.write().await.last_successful = Some(creds.clone());
                        info!(ssid = %ssid, ip = %ip, "Station connected");
                        return Ok(ip);
                    }
                }
                LinkStatus::WrongPassword => {
                    warn!(ssid = %ssid, "Association rejected: wrong password");
                    self.fail_station(FailureReason::WrongPassword).await;
                    return Err(DomainError::WrongPassword(ssid));
                }
                LinkStatus::NoApFound => {
                    warn!(ssid = %ssid, "Association failed: network not found");
                    self.fail_station(FailureReason::NetworkNotFound).await;
                    return Err(DomainError::NetworkNotFound(ssid));
                }
                LinkStatus::ConnectFailed => {
                    let reason = "association rejected".to_string();
                    warn!(ssid = %ssid, "Association failed");
                    self.fail_station(FailureReason::Radio(reason.clone())).await;
                    return Err(DomainError::ConnectFailed { ssid, reason });
                }
                LinkStatus::Idle | LinkStatus::Connecting => {}
            }

            if Instant::now() >= deadline {
                warn!(
                    ssid = %ssid,
                    timeout_ms = self.timings.connect_timeout.as_millis() as u64,
                    "Association timed out"
                );
                if let Err(e) = self.radio.disconnect().await {
                    debug!(error = %e, "Disconnect after timeout failed");
                }
                self.fail_station(FailureReason::Timeout).await;
                return Err(DomainError::ConnectTimeout(ssid));
            }

            sleep(self.timings.poll_interval).await;
        }
    }

    async fn fail_station(&self, reason: FailureReason) {
        self.set_state(InterfaceRole::Station, InterfaceState::Failed { reason }, None)
            .await;
    }

    /// Scan from the station radio. Returns unique SSIDs in the order the
    /// radio reported them; hidden networks are skipped.
    #[instrument(skip(self))]
    pub async fn scan(&self) -> Result<Vec<String>, DomainError> {
        if !self.radio.is_active(InterfaceRole::Station).await {
            self.radio
                .set_active(InterfaceRole::Station, true)
                .await
                .map_err(|e| {
                    warn!(error = %e, "Could not activate station for scan");
                    DomainError::ScanFailed(e.to_string())
                })?;
            let mut slot = self.station.write().await;
            if slot.state == InterfaceState::Down {
                slot.state = InterfaceState::Idle;
            }
        }

        let networks = self.radio.scan().await.map_err(|e| {
            warn!(error = %e, "Network scan failed");
            match e {
                DomainError::ScanFailed(_) => e,
                other => DomainError::ScanFailed(other.to_string()),
            }
        })?;

        let mut seen = HashSet::new();
        let ssids: Vec<String> = networks
            .into_iter()
            .filter(|network| !network.ssid.is_empty())
            .filter_map(|network| {
                if seen.insert(network.ssid.clone()) {
                    Some(network.ssid)
                } else {
                    None
                }
            })
            .collect();

        debug!(count = ssids.len(), "Scan complete");
        Ok(ssids)
    }

    pub async fn is_connected(&self, role: InterfaceRole) -> bool {
        if !self.slot(role).read().await.state.is_connected() {
            return false;
        }
        match role {
            InterfaceRole::AccessPoint => self.radio.is_active(role).await,
            InterfaceRole::Station => self.radio.link_status().await == LinkStatus::GotIp,
        }
    }

    pub async fn get_ip(&self, role: InterfaceRole) -> Option<Ipv4Addr> {
        if self.is_connected(role).await {
            self.radio.ip_address(role).await
        } else {
            None
        }
    }

    #[instrument(skip(self))]
    pub async fn stop(&self, role: InterfaceRole) -> Result<(), DomainError> {
        if role == InterfaceRole::Station {
            if let Err(e) = self.radio.disconnect().await {
                warn!(error = %e, "Station disconnect failed during stop");
            }
        }

        let result = self.radio.set_active(role, false).await;

        {
            let mut slot = self.slot(role).write().await;
            slot.managed = false;
            slot.state = InterfaceState::Down;
            slot.ssid = None;
        }

        match &result {
            Ok(()) => info!(role = %role, "Interface stopped"),
            Err(e) => warn!(role = %role, error = %e, "Interface did not power down cleanly"),
        }
        result
    }

    pub async fn stop_all(&self) {
        for role in [InterfaceRole::Station, InterfaceRole::AccessPoint] {
            // Already logged inside stop.
            let _ = self.stop(role).await;
        }
    }

    pub async fn state(&self, role: InterfaceRole) -> InterfaceState {
        self.slot(role).read().await.state.clone()
    }

    pub async fn status(&self, role: InterfaceRole) -> InterfaceStatus {
        let (state, ssid) = {
            let slot = self.slot(role).read().await;
            (slot.state.clone(), slot.ssid.clone())
        };
        InterfaceStatus {
            role,
            state,
            ssid,
            ip: self.get_ip(role).await,
        }
    }

    /// Roles whose radio currently reports active, regardless of link state.
    pub async fn active_roles(&self) -> Vec<InterfaceRole> {
        let mut active = Vec::with_capacity(InterfaceRole::ALL.len());
        for role in InterfaceRole::ALL {
            if self.radio.is_active(role).await {
                active.push(role);
            }
        }
        active
    }

    pub fn is_connect_in_progress(&self) -> bool {
        self.gate.is_held()
    }

    pub fn auto_reconnect_enabled(&self) -> bool {
        self.auto_reconnect.is_enabled()
    }

    pub fn suppress_auto_reconnect(&self) -> AutoReconnectGuard {
        self.auto_reconnect.suppress()
    }

    /// One pass of the health loop: restart a dropped access point and
    /// reconnect a station that lost its link.
    #[instrument(skip(self))]
    pub async fn run_health_check(&self) -> HealthReport {
        let access_point = self.check_access_point().await;
        let station = self.check_station().await;
        HealthReport {
            access_point,
            station,
        }
    }

    async fn check_access_point(&self) -> HealthAction {
        let (managed, connected) = {
            let slot = self.access_point.read().await;
            (slot.managed, slot.state.is_connected())
        };
        if !managed {
            return HealthAction::NotManaged;
        }
        if connected && self.radio.is_active(InterfaceRole::AccessPoint).await {
            return HealthAction::Healthy;
        }

        let Some(settings) = self.ap_settings.read().await.clone() else {
            return HealthAction::NotManaged;
        };

        warn!(ssid = %settings.ssid, "Access point inactive, restarting");
        self.set_state(InterfaceRole::AccessPoint, InterfaceState::Activating, None)
            .await;

        match self.activate_access_point(&settings).await {
            Ok(()) => {
                self.set_state(
                    InterfaceRole::AccessPoint,
                    InterfaceState::Connected,
                    Some(settings.ssid.clone()),
                )
                .await;
                info!(ssid = %settings.ssid, "Access point restarted");
                HealthAction::Restarted
            }
            Err(e) => {
                error!(error = %e, "Access point restart failed");
                self.set_state(
                    InterfaceRole::AccessPoint,
                    InterfaceState::Failed {
                        reason: FailureReason::Radio(e.to_string()),
                    },
                    None,
                )
                .await;
                HealthAction::RestartFailed(e.to_string())
            }
        }
    }

    async fn check_station(&self) -> HealthAction {
        let (managed, connected) = {
            let slot = self.station.read().await;
            (slot.managed, slot.state.is_connected())
        };
        if !managed {
            return HealthAction::NotManaged;
        }
        if self.gate.is_held() {
            return HealthAction::SkippedConnectInProgress;
        }

        if connected {
            if self.radio.link_status().await == LinkStatus::GotIp {
                return HealthAction::Healthy;
            }
            let mut slot = self.station.write().await;
            if slot.state.is_connected() && !self.gate.is_held() {
                warn!(ssid = ?slot.ssid, "Station link lost");
                slot.state = InterfaceState::Down;
                slot.ssid = None;
            }
        }

        if !self.auto_reconnect.is_enabled() {
            return HealthAction::SkippedSuppressed;
        }

        let creds = {
            let memory = self.station_memory.read().await;
            memory
                .last_successful
                .clone()
                .or_else(|| memory.configured.clone())
        };
        let Some(creds) = creds else {
            return HealthAction::SkippedNoCredentials;
        };

        let Some(permit) = self.gate.try_acquire() else {
            return HealthAction::SkippedConnectInProgress;
        };
        // A manual request may have suppressed reconnection while we waited.
        if !self.auto_reconnect.is_enabled() {
            return HealthAction::SkippedSuppressed;
        }

        info!(ssid = %creds.ssid, "Reconnecting station");
        match self.connect_with_permit(&creds, permit).await {
            Ok(ip) => HealthAction::Reconnected(ip),
            Err(e) => HealthAction::ReconnectFailed(e.to_string()),
        }
    }
}
