//! Server error types.

use adminforge_core::ConfigError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors raised while assembling the resource registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("resource registered twice: {name}")]
    DuplicateResource { name: String },
}

/// Errors returned by schema handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unknown resource: {name}")]
    ResourceNotFound { name: String },
    #[error("unknown action: {action}")]
    UnknownAction { action: String },
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::UnknownAction { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
