use captive_portal_domain::{Credentials, DomainError, InterfaceRole};
use serde::Serialize;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::services::InterfaceManager;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectOutcome {
    pub ssid: String,
    pub ip: Ipv4Addr,
}

/// Use case: join an upstream network on behalf of a portal user
pub struct ConnectStationUseCase {
    interfaces: Arc<InterfaceManager>,
}

impl ConnectStationUseCase {
    pub fn new(interfaces: Arc<InterfaceManager>) -> Self {
        Self { interfaces }
    }

    /// Background reconnection stays off for as long as this call runs and
    /// comes back on however it ends.
    #[instrument(skip(self, password))]
    pub async fn execute(&self, ssid: &str, password: &str) -> Result<ConnectOutcome, DomainError> {
        Credentials::validate_ssid(ssid)?;

        if self.interfaces.is_connect_in_progress() {
            return Err(DomainError::ConnectInProgress);
        }

        let _suppressed = self.interfaces.suppress_auto_reconnect();
        match self
            .interfaces
            .connect(InterfaceRole::Station, ssid, password)
            .await
        {
            Ok(ip) => {
                info!(ssid = %ssid, ip = %ip, "Portal connect succeeded");
                Ok(ConnectOutcome {
                    ssid: ssid.to_string(),
                    ip,
                })
            }
            Err(e) => {
                warn!(ssid = %ssid, error = %e, "Portal connect failed");
                Err(e)
            }
        }
    }
}
