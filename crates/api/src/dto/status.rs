use captive_portal_application::use_cases::NetworkStatus;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub network: NetworkStatus,
    pub portal_ip: String,
    pub tls_active: bool,
}
