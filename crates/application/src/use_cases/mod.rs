pub mod network;

pub use network::{
    ConnectOutcome, ConnectStationUseCase, GetNetworkStatusUseCase, NetworkStatus,
    ScanNetworksUseCase,
};
