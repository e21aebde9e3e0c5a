use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use captive_portal_domain::DomainError;
use serde_json::json;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::InvalidRequest(_)
            | DomainError::MissingField(_)
            | DomainError::InvalidPassphrase(_)
            | DomainError::InvalidIpAddress(_)
            | DomainError::InvalidCidr(_)
            | DomainError::UnsupportedRole(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),

            DomainError::ConnectInProgress => (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string()),

            DomainError::WrongPassword(_)
            | DomainError::NetworkNotFound(_)
            | DomainError::ConnectFailed { .. }
            | DomainError::ConnectTimeout(_)
            | DomainError::ScanFailed(_)
            | DomainError::Radio(_)
            | DomainError::InterfaceNotStarted(_)
            | DomainError::ActivationTimeout { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
            }

            DomainError::AssetUnavailable(_) | DomainError::IoError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
