//! HTTP error mapping

use crate::map::SignalError;
use crate::music::MusicError;
use crate::storage::StorageError;
use crate::validation::ValidationError;
use crate::vehicle::VehicleError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

/// Error returned by every handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid GPS data")]
    Validation(Vec<ValidationError>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(errors) => json!({
                "message": self.to_string(),
                "errors": errors,
            }),
            ApiError::Internal(message) => {
                error!("request failed: {}", message);
                json!({ "message": message })
            }
            ApiError::Upstream(message) => {
                warn!("upstream failure: {}", message);
                json!({ "message": message })
            }
            _ => json!({ "message": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<Vec<ValidationError>> for ApiError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![ValidationError::MalformedBody {
            detail: rejection.body_text(),
        }])
    }
}

impl From<VehicleError> for ApiError {
    fn from(error: VehicleError) -> Self {
        match error {
            VehicleError::NotFound { .. } => ApiError::NotFound(error.to_string()),
            VehicleError::Unauthorized => ApiError::Unauthorized(error.to_string()),
            VehicleError::NotConfigured(_) => ApiError::Internal(error.to_string()),
            VehicleError::Unavailable { .. }
            | VehicleError::InvalidLocation(_)
            | VehicleError::Transport(_) => ApiError::Upstream(error.to_string()),
        }
    }
}

impl From<MusicError> for ApiError {
    fn from(error: MusicError) -> Self {
        match error {
            MusicError::NotConnected(_) => ApiError::NotFound(error.to_string()),
            MusicError::Exchange(_) | MusicError::Transport(_) => ApiError::Upstream(error.to_string()),
            MusicError::NotConfigured(_) | MusicError::InvalidUrl(_) => {
                ApiError::Internal(error.to_string())
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(_) => ApiError::NotFound(error.to_string()),
        }
    }
}

impl From<SignalError> for ApiError {
    fn from(_: SignalError) -> Self {
        ApiError::Internal("map dashboard is not running".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_error_statuses() {
        let status = |e: VehicleError| ApiError::from(e).status();
        assert_eq!(status(VehicleError::NotFound { vehicle_id: "1".into() }), StatusCode::NOT_FOUND);
        assert_eq!(status(VehicleError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status(VehicleError::Unavailable { vehicle_id: "1".into() }), StatusCode::BAD_GATEWAY);
        assert_eq!(status(VehicleError::Transport("reset".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status(VehicleError::NotConfigured("DIMO_CLIENT_ID")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_music_error_statuses() {
        assert_eq!(
            ApiError::from(MusicError::NotConnected("u".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(MusicError::Exchange("invalid_grant".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
