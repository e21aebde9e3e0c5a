use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use captive_portal_domain::ClientSide;
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::state::AppState;

/// Side of the appliance the peer connected from. Requests that carry no
/// peer address classify as [`ClientSide::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerSide(pub ClientSide);

impl FromRequestParts<AppState> for PeerSide {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let side = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| state.classifier.classify(addr.ip()))
            .unwrap_or(ClientSide::Unknown);
        Ok(PeerSide(side))
    }
}
