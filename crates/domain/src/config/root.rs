use serde::{Deserialize, Serialize};
use std::path::Path;

use super::access_point::AccessPointConfig;
use super::errors::ConfigError;
use super::interfaces::InterfacesConfig;
use super::logging::LoggingConfig;
use super::radio::RadioConfig;
use super::server::ServerConfig;
use super::shutdown::ShutdownConfig;
use super::station::StationConfig;
use super::tls::TlsConfig;
use super::watchdog::WatchdogConfig;
use crate::client_side::network_for;
use crate::credentials::{validate_passphrase, Credentials};
use crate::interface::AccessPointSettings;

const LOCAL_CONFIG_PATH: &str = "portal.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/captive-portal/config.toml";

/// Main configuration structure for the captive portal appliance
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub access_point: AccessPointConfig,

    #[serde(default)]
    pub station: StationConfig,

    #[serde(default)]
    pub tls: TlsConfig,

    #[serde(default)]
    pub interfaces: InterfacesConfig,

    #[serde(default)]
    pub radio: RadioConfig,

    #[serde(default)]
    pub watchdog: WatchdogConfig,

    #[serde(default)]
    pub shutdown: ShutdownConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    /// The file was absent or unreadable as TOML; defaults were written in its place.
    DefaultsWritten,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. portal.toml in current directory
    /// 3. /etc/captive-portal/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load the file at `path`, replacing it with defaults when it is missing
    /// or malformed. Overrides are applied after the write so they never end
    /// up persisted.
    pub fn load_or_init(
        path: &str,
        cli_overrides: CliOverrides,
    ) -> Result<(Self, ConfigOrigin), ConfigError> {
        let (mut config, origin) = match Self::from_file(path) {
            Ok(config) => (config, ConfigOrigin::File),
            Err(ConfigError::FileRead(..)) | Err(ConfigError::Parse(_)) => {
                let defaults = Self::default();
                defaults.save(path)?;
                (defaults, ConfigOrigin::DefaultsWritten)
            }
            Err(e) => return Err(e),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok((config, origin))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.http_port {
            self.server.http_ports = vec![port];
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(root) = overrides.web_root {
            self.server.web_root = root;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.http_ports.is_empty() {
            return Err(ConfigError::Validation(
                "At least one HTTP port is required".to_string(),
            ));
        }

        if self
            .server
            .http_ports
            .iter()
            .chain(self.server.https_ports.iter())
            .any(|port| *port == 0)
        {
            return Err(ConfigError::Validation("HTTP(S) ports cannot be 0".to_string()));
        }

        if self.server.max_connections == 0 {
            return Err(ConfigError::Validation(
                "max_connections must be at least 1".to_string(),
            ));
        }

        Credentials::validate_ssid(&self.access_point.ssid)
            .map_err(|e| ConfigError::Validation(format!("access_point.ssid: {}", e)))?;

        validate_passphrase(self.access_point.auth_mode, &self.access_point.password)
            .map_err(|e| ConfigError::Validation(format!("access_point.password: {}", e)))?;

        self.access_point.portal_ip()?;
        network_for(self.access_point.address()?, self.access_point.netmask()?)
            .map_err(ConfigError::Validation)?;

        self.station.ip_config()?;

        if self.interfaces.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "interfaces.poll_interval_ms cannot be 0".to_string(),
            ));
        }

        if self.interfaces.health_check_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "interfaces.health_check_interval_secs cannot be 0".to_string(),
            ));
        }

        if self.watchdog.enabled && self.watchdog.feed_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "watchdog.feed_interval_secs cannot be 0".to_string(),
            ));
        }

        if self.watchdog.enabled && self.watchdog.feed_interval_secs >= self.watchdog.timeout_secs {
            return Err(ConfigError::Validation(format!(
                "watchdog feed interval ({}s) must be shorter than its timeout ({}s)",
                self.watchdog.feed_interval_secs, self.watchdog.timeout_secs
            )));
        }

        Ok(())
    }

    pub fn access_point_settings(&self) -> Result<AccessPointSettings, ConfigError> {
        Ok(AccessPointSettings {
            ssid: self.access_point.ssid.clone(),
            password: self.access_point.password.clone(),
            auth_mode: self.access_point.auth_mode,
            address: self.access_point.address()?,
            netmask: self.access_point.netmask()?,
            channel: self.access_point.channel,
        })
    }

    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|candidate| Path::new(candidate).exists())
            .map(str::to_string)
    }

    /// Path written to when no configuration file exists yet.
    pub fn default_config_path() -> &'static str {
        LOCAL_CONFIG_PATH
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub http_port: Option<u16>,
    pub bind_address: Option<String>,
    pub web_root: Option<String>,
    pub log_level: Option<String>,
}
