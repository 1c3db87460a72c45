//! Error types for motolens-vp

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::{GatewayError, ResolveError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// VIN was well-formed but the decoder could not identify the vehicle (422)
    #[error("{0}")]
    VinNotRecognized(String),

    /// Vehicle not resolvable against the catalog (404)
    #[error("{0}")]
    NotFound(String),

    /// Catalog provider failure (502)
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// Catalog provider timeout (504)
    #[error("{0}")]
    UpstreamTimeout(String),
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        let message = err.to_string();
        match err {
            ResolveError::Gateway(GatewayError::Timeout(_)) => ApiError::UpstreamTimeout(message),
            ResolveError::Gateway(_) => ApiError::UpstreamUnavailable(message),
            ResolveError::Normalization(_) => ApiError::VinNotRecognized(message),
            ResolveError::ManufacturerNotFound(_)
            | ResolveError::ModelNotFound { .. }
            | ResolveError::NoVariants(_) => ApiError::NotFound(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::VinNotRecognized(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VIN_NOT_RECOGNIZED", msg)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_IN_CATALOG", msg),
            ApiError::UpstreamUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, "CATALOG_UNAVAILABLE", msg)
            }
            ApiError::UpstreamTimeout(msg) => {
                (StatusCode::GATEWAY_TIMEOUT, "CATALOG_TIMEOUT", msg)
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
