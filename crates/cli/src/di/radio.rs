use anyhow::Context;
use captive_portal_application::ports::WirelessRadio;
use captive_portal_domain::config::RadioConfig;
use captive_portal_infrastructure::radio::SimulatedRadio;
use std::sync::Arc;
use tracing::info;

/// The radio backend used when none is injected. Hardware drivers implement
/// [`WirelessRadio`] and are passed to `Appliance::with_radio` instead.
pub fn build_radio(config: &RadioConfig) -> anyhow::Result<Arc<dyn WirelessRadio>> {
    let radio = SimulatedRadio::from_config(config).context("building simulated radio")?;
    info!(networks = config.networks.len(), "Using simulated radio");
    Ok(Arc::new(radio))
}
