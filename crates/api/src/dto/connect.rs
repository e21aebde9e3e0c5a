use captive_portal_application::use_cases::ConnectOutcome;
use serde::{Deserialize, Serialize};

/// `application/x-www-form-urlencoded` body of `POST /connect`. Both fields
/// are optional here so a missing one can be reported by name.
#[derive(Deserialize)]
pub struct ConnectForm {
    pub ssid: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for ConnectForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectForm")
            .field("ssid", &self.ssid)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub status: &'static str,
    pub message: String,
    pub ip: String,
}

impl From<ConnectOutcome> for ConnectResponse {
    fn from(outcome: ConnectOutcome) -> Self {
        Self {
            status: "success",
            message: format!("Connected to {}", outcome.ssid),
            ip: outcome.ip.to_string(),
        }
    }
}
