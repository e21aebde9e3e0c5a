pub mod query;
pub mod spoofing;
pub mod wire_response;

pub use query::{encode_domain, parse_domain, DnsQuery};
pub use spoofing::{SpoofingHandler, SpoofingStats};
pub use wire_response::{build_spoofed_response, SPOOF_TTL};
