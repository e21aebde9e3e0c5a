//! Captive Portal Domain Layer
pub mod captive_probe;
pub mod client_side;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod interface;

pub use captive_probe::{classify_probe, ProbeResponse};
pub use client_side::{ClientSide, SubnetClassifier};
pub use config::{CliOverrides, Config, ConfigError, ConfigOrigin};
pub use credentials::Credentials;
pub use errors::DomainError;
pub use interface::{
    AccessPointSettings, AuthMode, FailureReason, InterfaceRole, InterfaceState,
    InterfaceStatus, LinkStatus, ScannedNetwork, StationIpConfig,
};
