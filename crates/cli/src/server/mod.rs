pub mod dns;
pub mod tls;
pub mod web;

pub use dns::DnsResponder;
pub use tls::load_tls_acceptor;
pub use web::HttpDispatcher;
