//! Detail engine: single-record view with duplicate-resolution fallback.
//!
//! Detail pages intentionally surface revoked and deprecated records, so the
//! first lookup runs without visibility restriction. An ambiguous result is
//! retried once restricted to current records; anything else propagates as
//! not found rather than masking a data integrity issue.

use std::sync::Arc;

use axum::response::Response;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::record::Record;
use crate::state::AppState;
use crate::store::LookupOutcome;
use crate::views::EntityContext;

/// Per-entity detail page layout. Required: there is no generic fallback
/// for detail rendering.
#[derive(Debug, Clone)]
pub struct DetailViewConfig {
    /// Fields shown on the detail page, in order.
    pub fields: Vec<&'static str>,
}

impl DetailViewConfig {
    pub fn new(fields: Vec<&'static str>) -> Self {
        Self { fields }
    }
}

/// Marker appended to the title of revoked records.
pub const REVOKED_SUFFIX: &str = "[revoked]";

pub async fn detail_view(
    ctx: Arc<EntityContext>,
    state: AppState,
    mitre_id: String,
) -> Result<Response, AppError> {
    let descriptor = &ctx.descriptor;
    if !descriptor.matches_id(&mitre_id) {
        return Err(AppError::NotFound);
    }

    let record = resolve_record(&state, &ctx, &mitre_id).await?;

    let mut context = Map::new();
    context.insert("title".into(), record.name.clone().into());
    context.insert(
        "title_suffix".into(),
        if record.revoked { REVOKED_SUFFIX } else { "" }.into(),
    );
    context.insert("mitre_id".into(), record.mitre_id.clone().into());
    context.insert(
        "fields".into(),
        Value::Object(
            ctx.detail
                .fields
                .iter()
                .map(|name| {
                    (
                        name.to_string(),
                        record.field(name).unwrap_or(Value::Null),
                    )
                })
                .collect(),
        ),
    );
    context.insert("record".into(), serde_json::to_value(&record)?);

    let template = format!("{}/detail.html", descriptor.model_name);
    state.renderer.render(&template, &Value::Object(context))
}

/// Look up the record, retrying an ambiguous match once against current
/// records only. The usual culprit for ambiguity is an identifier shared by
/// an active record and a deprecated or revoked one.
async fn resolve_record(
    state: &AppState,
    ctx: &EntityContext,
    mitre_id: &str,
) -> Result<Record, AppError> {
    let catalog = ctx.catalog;
    let entity = ctx.descriptor.model_name;
    match state.store.lookup(catalog, entity, mitre_id, false).await {
        LookupOutcome::Found(record) => Ok(record),
        LookupOutcome::NotFound => Err(AppError::NotFound),
        LookupOutcome::Ambiguous => {
            tracing::debug!(entity, mitre_id, "ambiguous lookup, retrying visible-only");
            match state.store.lookup(catalog, entity, mitre_id, true).await {
                LookupOutcome::Found(record) => Ok(record),
                // A second ambiguity or an empty retry is a genuine data
                // problem; propagate unchanged.
                _ => Err(AppError::NotFound),
            }
        }
    }
}
