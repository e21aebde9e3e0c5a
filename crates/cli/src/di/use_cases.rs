use captive_portal_application::services::InterfaceManager;
use captive_portal_application::use_cases::{
    ConnectStationUseCase, GetNetworkStatusUseCase, ScanNetworksUseCase,
};
use std::sync::Arc;

pub struct UseCases {
    pub scan_networks: Arc<ScanNetworksUseCase>,
    pub connect_station: Arc<ConnectStationUseCase>,
    pub get_status: Arc<GetNetworkStatusUseCase>,
}

impl UseCases {
    pub fn new(interfaces: Arc<InterfaceManager>) -> Self {
        Self {
            scan_networks: Arc::new(ScanNetworksUseCase::new(interfaces.clone())),
            connect_station: Arc::new(ConnectStationUseCase::new(interfaces.clone())),
            get_status: Arc::new(GetNetworkStatusUseCase::new(interfaces)),
        }
    }
}
