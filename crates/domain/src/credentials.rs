use std::fmt;

use crate::errors::DomainError;
use crate::interface::AuthMode;

pub const WPA2_MIN_PASSPHRASE_LEN: usize = 8;
pub const WPA2_MAX_PASSPHRASE_LEN: usize = 63;
pub const MAX_SSID_LEN: usize = 32;

/// SSID and passphrase pair. `Debug` never prints the passphrase.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String,
    pub password: String,
}

impl Credentials {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }

    pub fn validate_ssid(ssid: &str) -> Result<(), DomainError> {
        if ssid.is_empty() {
            return Err(DomainError::InvalidRequest("SSID cannot be empty".to_string()));
        }
        if ssid.len() > MAX_SSID_LEN {
            return Err(DomainError::InvalidRequest(format!(
                "SSID longer than {} bytes",
                MAX_SSID_LEN
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Access point passphrase policy: WPA2-PSK needs 8..=63 characters, an open
/// network must not carry a passphrase at all.
pub fn validate_passphrase(auth_mode: AuthMode, passphrase: &str) -> Result<(), DomainError> {
    match auth_mode {
        AuthMode::Open if !passphrase.is_empty() => Err(DomainError::InvalidPassphrase(
            "open access point must not have a passphrase".to_string(),
        )),
        AuthMode::Open => Ok(()),
        AuthMode::Wpa2Psk => {
            let len = passphrase.chars().count();
            if !(WPA2_MIN_PASSPHRASE_LEN..=WPA2_MAX_PASSPHRASE_LEN).contains(&len) {
                return Err(DomainError::InvalidPassphrase(format!(
                    "WPA2 passphrase must be {}-{} characters, got {}",
                    WPA2_MIN_PASSPHRASE_LEN, WPA2_MAX_PASSPHRASE_LEN, len
                )));
            }
            Ok(())
        }
    }
}
