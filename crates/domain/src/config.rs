pub mod access_point;
pub mod errors;
pub mod interfaces;
pub mod logging;
pub mod radio;
pub mod root;
pub mod server;
pub mod shutdown;
pub mod station;
pub mod tls;
pub mod watchdog;

pub use access_point::AccessPointConfig;
pub use errors::ConfigError;
pub use interfaces::InterfacesConfig;
pub use logging::LoggingConfig;
pub use radio::{RadioConfig, SimulatedNetworkConfig};
pub use root::{CliOverrides, Config, ConfigOrigin};
pub use server::ServerConfig;
pub use shutdown::ShutdownConfig;
pub use station::{StaticIpConfig, StationConfig};
pub use tls::TlsConfig;
pub use watchdog::WatchdogConfig;
