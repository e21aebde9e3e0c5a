pub mod connect_gate;
pub mod interface_manager;

pub use connect_gate::{AutoReconnect, AutoReconnectGuard, ConnectGate, ConnectPermit};
pub use interface_manager::{
    HealthAction, HealthReport, InterfaceManager, InterfaceTimings, RoleConfig, StationSettings,
};
