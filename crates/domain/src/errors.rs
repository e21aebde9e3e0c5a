use thiserror::Error;

use crate::interface::InterfaceRole;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing form field: {0}")]
    MissingField(&'static str),

    #[error("Invalid passphrase: {0}")]
    InvalidPassphrase(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR format: {0}")]
    InvalidCidr(String),

    #[error("Operation not supported on the {0} interface")]
    UnsupportedRole(InterfaceRole),

    #[error("{0} interface has not been started")]
    InterfaceNotStarted(InterfaceRole),

    #[error("{role} interface did not become active within {timeout_ms} ms")]
    ActivationTimeout { role: InterfaceRole, timeout_ms: u64 },

    #[error("A station connect operation is already in progress")]
    ConnectInProgress,

    #[error("Wrong password for network {0}")]
    WrongPassword(String),

    #[error("Network not found: {0}")]
    NetworkNotFound(String),

    #[error("Failed to join {ssid}: {reason}")]
    ConnectFailed { ssid: String, reason: String },

    #[error("Timed out joining {0}")]
    ConnectTimeout(String),

    #[error("Network scan failed: {0}")]
    ScanFailed(String),

    #[error("Radio error: {0}")]
    Radio(String),

    #[error("Asset not readable: {0}")]
    AssetUnavailable(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// True for failures reported by the radio while associating, as opposed
    /// to request validation or concurrency rejections.
    pub fn is_association_failure(&self) -> bool {
        matches!(
            self,
            DomainError::WrongPassword(_)
                | DomainError::NetworkNotFound(_)
                | DomainError::ConnectFailed { .. }
                | DomainError::ConnectTimeout(_)
        )
    }
}
