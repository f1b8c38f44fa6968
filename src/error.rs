//! Error types for the catalog browser.
//!
//! Two distinct families, per the error taxonomy:
//!
//! - [`ConfigError`]: registration-time defects (missing detail view,
//!   duplicate route name). These abort route composition and must never
//!   surface while serving requests.
//! - [`AppError`]: request-time outcomes (validation failure, not found,
//!   unrecognized identifier). These map onto HTTP responses so the
//!   presentation layer renders the correct error page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Registration-time configuration errors.
///
/// Raised while composing routes, before the server starts serving.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("entity `{entity}` has no detail view configuration")]
    MissingDetailView { entity: String },

    #[error("invalid id pattern for entity `{entity}`: {reason}")]
    InvalidIdPattern { entity: String, reason: String },

    #[error("duplicate route name `{name}` in namespace `{namespace}`")]
    DuplicateRouteName { namespace: String, name: String },

    #[error("no route named `{name}` in namespace `{namespace}`")]
    UnknownRouteName { namespace: String, name: String },

    #[error("identifier `{id}` does not match the pattern for route `{name}`")]
    IdentifierMismatch { name: String, id: String },
}

/// Validation errors for user-supplied filter criteria.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed filter criteria: {0}")]
    MalformedCriteria(String),

    #[error("filter criteria must be an array of conditions")]
    CriteriaShape,

    #[error("filter condition must be an object with `field`, `op` and `value`")]
    ConditionShape,

    #[error("field `{0}` is not filterable")]
    UnknownField(String),

    #[error("unsupported filter operation `{0}`")]
    UnknownOp(String),
}

/// Request-time application errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound,

    #[error("no entity type matches identifier `{0}`")]
    UnrecognizedIdentifier(String),

    /// Reverse-URL lookups go through the composed route table; a failure
    /// here means composition invariants were broken and is reported as a
    /// server error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::UnrecognizedIdentifier(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        } else {
            tracing::debug!("request rejected: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
