//! Filter-entry engine: a stateless submission endpoint.
//!
//! Accepts criteria by form submission over GET or POST (GET keeps filter
//! links shareable, POST allows larger payloads), validates them against
//! the entity's filterset, and redirects to the listing endpoint with the
//! criteria re-encoded as the `q` parameter. Invalid submissions re-render
//! the form with field errors; malformed state is never forwarded.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use url::form_urlencoded;

use crate::error::{AppError, ValidationError};
use crate::filtering::{codec, Criteria, CRITERIA_PARAM};
use crate::state::AppState;
use crate::views::context::base_context;
use crate::views::EntityContext;

#[derive(Debug, Deserialize, Default)]
pub struct FilterSubmission {
    /// Criteria as JSON text, straight from the form field.
    pub q: Option<String>,
}

pub async fn filter_entry_view(
    ctx: Arc<EntityContext>,
    state: AppState,
    submission: FilterSubmission,
) -> Result<Response, AppError> {
    // No submission at all: render the filter form page.
    let Some(raw) = submission.q else {
        return render_form(&ctx, &state, None, None).await;
    };

    match validate(&ctx, &raw) {
        Ok(criteria) => {
            let index_url = ctx.urls.reverse(&ctx.descriptor.url_name("index"))?;
            let target = match codec::encode(&criteria) {
                Some(token) => {
                    let qs = form_urlencoded::Serializer::new(String::new())
                        .append_pair(CRITERIA_PARAM, &token)
                        .finish();
                    format!("{index_url}?{qs}")
                }
                // Empty criteria: keep the listing URL clean.
                None => index_url,
            };
            Ok(Redirect::to(&target).into_response())
        }
        Err(err) => render_form(&ctx, &state, Some(&raw), Some(err)).await,
    }
}

fn validate(ctx: &EntityContext, raw: &str) -> Result<Criteria, ValidationError> {
    let criteria = codec::decode(Some(raw))?;
    // Construction is validation: a filterset is only built from criteria
    // the entity actually supports.
    ctx.filterset.build(&ctx.descriptor, criteria.clone())?;
    Ok(criteria)
}

async fn render_form(
    ctx: &EntityContext,
    state: &AppState,
    submitted: Option<&str>,
    error: Option<ValidationError>,
) -> Result<Response, AppError> {
    let descriptor = &ctx.descriptor;
    // Schemas come from a filterset over empty criteria.
    let filterset = ctx.filterset.build(descriptor, Criteria::empty())?;

    let mut context = base_context(state, ctx, filterset.as_ref(), false)?;
    context.insert(
        "title".into(),
        format!("Filter {}", descriptor.verbose_name_plural).into(),
    );
    context.insert(
        "form".into(),
        json!({ "q": submitted.map(Value::from).unwrap_or(Value::Null) }),
    );
    let has_errors = error.is_some();
    context.insert(
        "form_errors".into(),
        match &error {
            Some(err) => json!({ "q": [err.to_string()] }),
            None => json!({}),
        },
    );

    let template = format!("{}/filters.html", descriptor.model_name);
    let mut response = state.renderer.render(&template, &Value::Object(context))?;
    if has_errors {
        *response.status_mut() = StatusCode::UNPROCESSABLE_ENTITY;
    }
    Ok(response)
}
