//! Template-rendering collaborator seam.
//!
//! Page templating is an external concern; the engines assemble a context
//! payload and hand it to a [`Renderer`]. The built-in [`ContextRenderer`]
//! emits the template name and context as JSON, which is what the server
//! binary and the integration tests use.

use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};

use crate::error::AppError;

pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, context: &Value) -> Result<Response, AppError>;
}

/// Renders the raw page context as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextRenderer;

impl Renderer for ContextRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<Response, AppError> {
        Ok(Json(json!({
            "template": template,
            "context": context,
        }))
        .into_response())
    }
}
