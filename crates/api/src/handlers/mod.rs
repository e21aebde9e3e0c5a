pub mod network;
pub mod portal;

pub use network::{connect_station, get_status, scan_networks};
pub use portal::{serve_index, serve_portal};
