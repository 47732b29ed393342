// Core error taxonomy for the authorization/validation engine.
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::database::store::StoreError;

/// Failure modes returned (never thrown) across the orchestrator boundary.
/// Each carries the human-readable reason the caller renders directly.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or out-of-bounds input; caught before authorization or storage.
    #[error("{0}")]
    Validation(String),

    /// The identity lookup itself failed. Distinct from "no session", which
    /// resolves to an anonymous identity, not an error.
    #[error("{0}")]
    AuthResolution(String),

    /// Well-formed request, disallowed actor/action/resource combination.
    #[error("{0}")]
    Denied(String),

    /// Referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate vote, caught either by the optimistic pre-check or by the
    /// store's uniqueness constraint. Callers cannot tell the phases apart.
    #[error("{0}")]
    Conflict(String),

    /// Underlying persistence failure. Not retried at this layer.
    #[error("{0}")]
    Storage(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn denied(message: impl Into<String>) -> Self {
        CoreError::Denied(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CoreError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CoreError::Conflict(message.into())
    }

    /// Wrap a store failure that is not a uniqueness violation.
    pub fn storage(err: StoreError) -> Self {
        tracing::error!("storage error: {}", err);
        CoreError::Storage(err.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::AuthResolution(_) => StatusCode::UNAUTHORIZED,
            CoreError::Denied(_) => StatusCode::FORBIDDEN,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Conflict(_) => StatusCode::CONFLICT,
            CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The reason string surfaced to the caller.
    pub fn message(&self) -> &str {
        match self {
            CoreError::Validation(msg)
            | CoreError::AuthResolution(msg)
            | CoreError::Denied(msg)
            | CoreError::NotFound(msg)
            | CoreError::Conflict(msg)
            | CoreError::Storage(msg) => msg,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({
            "success": false,
            "error": self.message(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}
