pub mod connect;
pub mod status;

pub use connect::{ConnectForm, ConnectResponse};
pub use status::StatusResponse;
