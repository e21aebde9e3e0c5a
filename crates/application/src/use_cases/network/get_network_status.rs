use captive_portal_domain::{InterfaceRole, InterfaceStatus};
use serde::Serialize;
use std::sync::Arc;

use crate::services::InterfaceManager;

#[derive(Debug, Clone, Serialize)]
pub struct NetworkStatus {
    pub access_point: InterfaceStatus,
    pub station: InterfaceStatus,
    pub active_interfaces: Vec<InterfaceRole>,
    pub auto_reconnect_enabled: bool,
    pub connect_in_progress: bool,
}

pub struct GetNetworkStatusUseCase {
    interfaces: Arc<InterfaceManager>,
}

impl GetNetworkStatusUseCase {
    pub fn new(interfaces: Arc<InterfaceManager>) -> Self {
        Self { interfaces }
    }

    pub async fn execute(&self) -> NetworkStatus {
        NetworkStatus {
            access_point: self.interfaces.status(InterfaceRole::AccessPoint).await,
            station: self.interfaces.status(InterfaceRole::Station).await,
            active_interfaces: self.interfaces.active_roles().await,
            auto_reconnect_enabled: self.interfaces.auto_reconnect_enabled(),
            connect_in_progress: self.interfaces.is_connect_in_progress(),
        }
    }
}
