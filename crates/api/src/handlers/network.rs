use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use captive_portal_domain::DomainError;
use tracing::{debug, info, instrument, warn};

use crate::dto::{ConnectForm, ConnectResponse, StatusResponse};
use crate::errors::ApiError;
use crate::state::AppState;

#[instrument(skip(state), name = "api_scan_networks")]
pub async fn scan_networks(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    match state.scan_networks.execute().await {
        Ok(ssids) => {
            debug!(count = ssids.len(), "Scan results ready");
            Ok(Json(ssids))
        }
        Err(e) => {
            warn!(error = %e, "Scan request failed");
            Err(e.into())
        }
    }
}

#[instrument(skip_all, name = "api_connect_station")]
pub async fn connect_station(
    State(state): State<AppState>,
    form: Result<Form<ConnectForm>, FormRejection>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let Form(form) = form.map_err(|e| DomainError::InvalidRequest(e.body_text()))?;
    let ssid = form.ssid.ok_or(DomainError::MissingField("ssid"))?;
    let password = form.password.ok_or(DomainError::MissingField("password"))?;

    info!(ssid = %ssid, "Connect requested from portal");
    let outcome = state.connect_station.execute(&ssid, &password).await?;
    Ok(Json(outcome.into()))
}

#[instrument(skip(state), name = "api_get_status")]
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        network: state.get_status.execute().await,
        portal_ip: state.portal_ip.to_string(),
        tls_active: state.tls_active,
    })
}
