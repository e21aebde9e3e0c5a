pub mod connect_station;
pub mod get_network_status;
pub mod scan_networks;

pub use connect_station::{ConnectOutcome, ConnectStationUseCase};
pub use get_network_status::{GetNetworkStatusUseCase, NetworkStatus};
pub use scan_networks::ScanNetworksUseCase;
