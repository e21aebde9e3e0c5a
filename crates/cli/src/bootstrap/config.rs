use anyhow::Context;
use captive_portal_domain::{CliOverrides, Config, ConfigOrigin};

pub struct LoadedConfig {
    pub config: Config,
    pub origin: ConfigOrigin,
    pub path: String,
}

/// Resolves the configuration file (explicit path, then the usual search
/// locations, then `portal.toml`), writing defaults there if it cannot be
/// used, and validates the result.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<LoadedConfig> {
    let path = path
        .map(str::to_string)
        .or_else(Config::get_config_path)
        .unwrap_or_else(|| Config::default_config_path().to_string());

    let (config, origin) = Config::load_or_init(&path, overrides)
        .with_context(|| format!("loading configuration from {}", path))?;

    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path))?;

    Ok(LoadedConfig {
        config,
        origin,
        path,
    })
}
