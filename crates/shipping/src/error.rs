//! Unified error handling for the shipping service.

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::carrier::CarrierError;

/// Application-level error type for the shipping service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Carrier API operation failed.
    #[error("Carrier error: {0}")]
    Carrier(Arc<CarrierError>),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<Arc<CarrierError>> for AppError {
    fn from(err: Arc<CarrierError>) -> Self {
        Self::Carrier(err)
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Carrier(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Shipping request error"
            );
        }

        let status = match &self {
            Self::Carrier(err) => match err.as_ref() {
                CarrierError::RateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let error = match &self {
            Self::Carrier(_) => "External service error".to_string(),
            Self::BadRequest(_) => self.to_string(),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        let err = AppError::from(Arc::new(CarrierError::TokenExpired));
        assert_eq!(err.to_string(), "Carrier error: Access token expired");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::from(Arc::new(CarrierError::TokenExpired))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::from(Arc::new(CarrierError::RateLimited(30)))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
