use captive_portal_application::ports::AssetStore;
use captive_portal_application::use_cases::{
    ConnectStationUseCase, GetNetworkStatusUseCase, ScanNetworksUseCase,
};
use captive_portal_domain::SubnetClassifier;
use std::net::Ipv4Addr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub scan_networks: Arc<ScanNetworksUseCase>,
    pub connect_station: Arc<ConnectStationUseCase>,
    pub get_status: Arc<GetNetworkStatusUseCase>,
    pub assets: Arc<dyn AssetStore>,
    pub classifier: Arc<SubnetClassifier>,
    pub portal_ip: Ipv4Addr,
    /// Whether secure listeners came up; reported by `/status` only.
    pub tls_active: bool,
}
