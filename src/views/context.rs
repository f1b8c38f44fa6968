//! Context payload contract shared by index and filter pages.
//!
//! Every such page carries the listing URL, the filtering URL, a
//! filter-active flag, both filtering schemas, and the debug flag, so a
//! client can self-describe the available filters without a second round
//! trip.

use serde_json::{Map, Value};

use crate::error::AppError;
use crate::filtering::FilterSet;
use crate::state::AppState;
use crate::views::EntityContext;

pub fn base_context(
    state: &AppState,
    ctx: &EntityContext,
    filterset: &dyn FilterSet,
    is_filtered: bool,
) -> Result<Map<String, Value>, AppError> {
    let descriptor = &ctx.descriptor;
    let mut context = Map::new();
    context.insert(
        "listing_url".into(),
        ctx.urls.reverse(&descriptor.url_name("index"))?.into(),
    );
    context.insert(
        "filtering_url".into(),
        ctx.urls.reverse(&descriptor.url_name("filter"))?.into(),
    );
    context.insert(
        "filter_url_name".into(),
        descriptor.url_name("filter").into(),
    );
    context.insert("is_filtered".into(), is_filtered.into());
    context.insert(
        "filtering_options_schema".into(),
        mark_hidden_options(
            filterset.filtering_options_schema(),
            &ctx.index.hidden_filter_fields,
        ),
    );
    context.insert("filtering_json_schema".into(), filterset.json_schema());
    context.insert("debug".into(), state.debug.into());
    Ok(context)
}

/// Some filter options exist in the filterset but are not offered in the
/// flat filter form (e.g. collection and tactic narrowing on techniques).
/// They stay in the schema, flagged for the client to hide.
fn mark_hidden_options(mut options: Value, hidden: &[&'static str]) -> Value {
    if hidden.is_empty() {
        return options;
    }
    if let Value::Array(items) = &mut options {
        for item in items {
            let is_hidden = item
                .get("field")
                .and_then(Value::as_str)
                .map(|f| hidden.contains(&f))
                .unwrap_or(false);
            if is_hidden {
                if let Value::Object(obj) = item {
                    obj.insert("hidden".into(), Value::Bool(true));
                }
            }
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hidden_fields_are_flagged_not_removed() {
        let options = json!([
            {"field": "name", "operations": ["contains"]},
            {"field": "tactic", "operations": ["exact"]},
        ]);
        let marked = mark_hidden_options(options, &["tactic"]);
        let items = marked.as_array().unwrap();
        assert!(items[0].get("hidden").is_none());
        assert_eq!(items[1]["hidden"], json!(true));
    }
}
