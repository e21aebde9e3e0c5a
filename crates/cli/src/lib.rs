//! Captive portal appliance: process wiring for the DNS responder, the
//! HTTP(S) dispatcher and the interface jobs.

pub mod appliance;
pub mod bootstrap;
pub mod di;
pub mod server;

pub use appliance::{Appliance, RunningAppliance};
