//! Everything that is not part of the control API: the index page, captive
//! probes, navigation redirects and static assets.

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use captive_portal_domain::captive_probe::{
    is_dotless, portal_location, wrong_content_body, INDEX_PATH,
};
use captive_portal_domain::{classify_probe, ProbeResponse};
use tracing::{debug, instrument};

use crate::errors::ApiError;
use crate::middleware::PeerSide;
use crate::state::AppState;

const NOT_FOUND_BODY: &str = "<h1>404 Not Found</h1>";

pub async fn serve_index(State(state): State<AppState>) -> Result<Response, ApiError> {
    serve_asset(&state, INDEX_PATH).await
}

/// Fallback for every path without an explicit route.
///
/// Captive probes and dot-less navigations are only diverted for clients on
/// the access point; anyone else gets plain static file behaviour.
#[instrument(skip(state, method))]
pub async fn serve_portal(
    State(state): State<AppState>,
    side: PeerSide,
    method: Method,
    uri: Uri,
) -> Result<Response, ApiError> {
    let path = uri.path();

    if side.0.is_access_point() {
        if let Some(probe) = classify_probe(path) {
            debug!(path, ?probe, "Captive probe intercepted");
            return Ok(match probe {
                ProbeResponse::Redirect => redirect_to_portal(&state),
                ProbeResponse::WrongContent => {
                    no_store(Html(wrong_content_body(state.portal_ip)).into_response())
                }
            });
        }
        if is_dotless(path) {
            return Ok(redirect_to_portal(&state));
        }
    }

    if method != Method::GET && method != Method::HEAD {
        return Ok(not_found());
    }

    serve_asset(&state, path).await
}

async fn serve_asset(state: &AppState, path: &str) -> Result<Response, ApiError> {
    match state.assets.fetch(path).await? {
        Some(asset) => Ok((
            [(header::CONTENT_TYPE, asset.content_type)],
            asset.bytes,
        )
            .into_response()),
        None => Ok(not_found()),
    }
}

fn redirect_to_portal(state: &AppState) -> Response {
    no_store(
        (
            StatusCode::FOUND,
            [(header::LOCATION, portal_location(state.portal_ip))],
        )
            .into_response(),
    )
}

fn no_store(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_BODY)).into_response()
}
