use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    /// Plain HTTP listeners. Every port that binds is served.
    #[serde(default = "default_http_ports")]
    pub http_ports: Vec<u16>,

    /// TLS listeners, only opened when the certificate and key load.
    #[serde(default = "default_https_ports")]
    pub https_ports: Vec<u16>,

    #[serde(default = "default_web_root")]
    pub web_root: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            dns_port: default_dns_port(),
            http_ports: default_http_ports(),
            https_ports: default_https_ports(),
            web_root: default_web_root(),
            max_connections: default_max_connections(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_dns_port() -> u16 {
    53
}

fn default_http_ports() -> Vec<u16> {
    vec![80]
}

fn default_https_ports() -> Vec<u16> {
    vec![443]
}

fn default_web_root() -> String {
    "www".to_string()
}

fn default_max_connections() -> usize {
    16
}

fn default_request_timeout_secs() -> u64 {
    10
}
