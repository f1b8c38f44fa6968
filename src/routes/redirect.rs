//! Redirect-by-identifier endpoint.
//!
//! Accepts a free-form identifier, canonicalizes its leading alphabetic
//! prefix to uppercase, determines the owning entity type from the
//! identifier's shape, and redirects to that entity's detail page.

use std::sync::Arc;

use axum::response::{IntoResponse, Redirect, Response};

use crate::entity::EntityDescriptor;
use crate::error::AppError;
use crate::routes::urls::UrlMap;

/// Canonicalize the leading one-or-two-letter prefix to uppercase
/// (`t1566.001` → `T1566.001`, `ds0001` → `DS0001`).
pub fn canonicalize_id(raw: &str) -> String {
    let prefix_len = raw
        .chars()
        .take(2)
        .take_while(|c| c.is_ascii_alphabetic())
        .count();
    let (prefix, rest) = raw.split_at(prefix_len);
    format!("{}{rest}", prefix.to_ascii_uppercase())
}

/// Find the entity whose identifier pattern matches `id`.
pub fn entity_for_id<'a>(
    descriptors: &'a [EntityDescriptor],
    id: &str,
) -> Option<&'a EntityDescriptor> {
    descriptors.iter().find(|d| d.matches_id(id))
}

pub async fn redirect_by_id(
    descriptors: Arc<Vec<EntityDescriptor>>,
    urls: Arc<UrlMap>,
    raw_id: String,
) -> Result<Response, AppError> {
    let id = canonicalize_id(&raw_id);
    let Some(descriptor) = entity_for_id(&descriptors, &id) else {
        // Guessing an entity type here would send users to the wrong page.
        return Err(AppError::UnrecognizedIdentifier(raw_id));
    };
    let url = urls.reverse_with_id(&descriptor.url_name("detail"), &id)?;
    tracing::debug!(%id, entity = descriptor.model_name, "identifier redirect");
    Ok(Redirect::to(&url).into_response())
}
