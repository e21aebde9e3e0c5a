mod asset_store;
mod watchdog;
mod wireless_radio;

pub use asset_store::{Asset, AssetStore};
pub use watchdog::Watchdog;
pub use wireless_radio::WirelessRadio;
