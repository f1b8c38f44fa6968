//! Listing engine: the generic paginated, filterable, sortable index view.
//!
//! Per-request pipeline, in strict order: full collection → baseline
//! visibility filter → criteria decode → filterset narrowing → sort
//! directive → pagination → render.

use std::sync::Arc;

use axum::response::Response;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::entity::EntityDescriptor;
use crate::error::AppError;
use crate::filtering::codec;
use crate::record::Record;
use crate::state::AppState;
use crate::views::context::base_context;
use crate::views::EntityContext;

/// Fixed page size for all listings.
pub const PAGE_SIZE: usize = 20;

/// Per-entity index view configuration.
#[derive(Debug, Clone, Default)]
pub struct IndexViewConfig {
    /// Filter options kept out of the flat filter form (still present in
    /// the schemas, flagged hidden).
    pub hidden_filter_fields: Vec<&'static str>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListingQuery {
    /// Encoded filter criteria token.
    pub q: Option<String>,
    /// Single-column sort directive, `-` prefix for descending.
    pub order: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
}

/// One page of records.
#[derive(Debug)]
pub struct Page {
    pub number: usize,
    pub total_pages: usize,
    pub total_records: usize,
    pub records: Vec<Record>,
}

impl Page {
    /// Slice out page `number`. Page numbers outside the valid range are a
    /// not-found condition; page 1 of an empty collection is valid.
    pub fn paginate(records: Vec<Record>, number: usize, size: usize) -> Result<Self, AppError> {
        if number == 0 {
            return Err(AppError::NotFound);
        }
        let total_records = records.len();
        let total_pages = std::cmp::max(1, total_records.div_ceil(size));
        if number > total_pages {
            return Err(AppError::NotFound);
        }
        let start = (number - 1) * size;
        let records = records
            .into_iter()
            .skip(start)
            .take(size)
            .collect::<Vec<_>>();
        Ok(Self {
            number,
            total_pages,
            total_records,
            records,
        })
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Validate a sort directive against the entity's displayable fields.
///
/// Only one field at a time; a leading `-` marks descending order. A
/// directive naming an undeclared field is treated as absent, which guards
/// against sorting by arbitrary fields.
pub fn sort_directive<'a>(
    order: Option<&'a str>,
    descriptor: &EntityDescriptor,
) -> Option<(&'a str, bool)> {
    let raw = order?.trim();
    if raw.is_empty() {
        return None;
    }
    let (field, descending) = match raw.strip_prefix('-') {
        Some(field) => (field, true),
        None => (raw, false),
    };
    descriptor.has_field(field).then_some((field, descending))
}

fn sort_records(records: &mut [Record], field: &str, descending: bool) {
    records.sort_by_cached_key(|r| {
        r.field_text(field)
            .map(|t| t.to_lowercase())
            .unwrap_or_default()
    });
    if descending {
        records.reverse();
    }
}

/// Sort-cycle state for a column header: asc → desc → none.
fn sort_state(current: Option<&str>, field: &str) -> Value {
    let (sort_order, next_order_value) = match current {
        Some(c) if c == field => ("asc", format!("-{field}")),
        Some(c) if c.strip_prefix('-') == Some(field) => ("desc", String::new()),
        _ => ("", field.to_string()),
    };
    json!({
        "sort_order": sort_order,
        "next_order_value": next_order_value,
    })
}

pub async fn listing_view(
    ctx: Arc<EntityContext>,
    state: AppState,
    query: ListingQuery,
) -> Result<Response, AppError> {
    let descriptor = &ctx.descriptor;

    // 1. Full collection, 2. baseline visibility.
    let records = state.store.list(ctx.catalog, descriptor.model_name).await;
    let mut records: Vec<Record> = records.into_iter().filter(|r| r.is_visible()).collect();

    // 3. Decode criteria; malformed tokens surface as validation errors.
    let criteria = codec::decode(query.q.as_deref())?;
    let is_filtered = !criteria.is_empty();

    // The filterset is built regardless so the schemas can be rendered;
    // narrowing only applies to non-empty criteria.
    let filterset = ctx.filterset.build(descriptor, criteria)?;
    if is_filtered {
        records = filterset.filter(records);
    }

    // 5. Sort directive, validated against declared fields.
    if let Some((field, descending)) = sort_directive(query.order.as_deref(), descriptor) {
        sort_records(&mut records, field, descending);
    }

    // 6. Paginate and render.
    let page = Page::paginate(records, query.page.unwrap_or(1), PAGE_SIZE)?;

    let mut context = base_context(&state, &ctx, filterset.as_ref(), is_filtered)?;
    context.insert("title".into(), descriptor.verbose_name_plural.into());
    context.insert(
        "fields".into(),
        Value::Array(
            descriptor
                .fields
                .iter()
                .map(|f| Value::String(f.name.to_string()))
                .collect(),
        ),
    );
    context.insert(
        "ordering".into(),
        Value::Object(
            descriptor
                .fields
                .iter()
                .map(|f| {
                    (
                        f.name.to_string(),
                        sort_state(query.order.as_deref(), f.name),
                    )
                })
                .collect::<Map<_, _>>(),
        ),
    );
    context.insert("records".into(), serde_json::to_value(&page.records)?);
    context.insert(
        "page".into(),
        json!({
            "number": page.number,
            "total_pages": page.total_pages,
            "total_records": page.total_records,
            "has_next": page.has_next(),
            "has_previous": page.has_previous(),
        }),
    );

    let template = format!("{}/index.html", descriptor.model_name);
    state.renderer.render(&template, &Value::Object(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FieldSpec;

    fn descriptor() -> EntityDescriptor {
        EntityDescriptor::new(
            "technique",
            "Technique",
            "Techniques",
            vec![
                FieldSpec::filterable("mitre_id"),
                FieldSpec::filterable("name"),
            ],
            r"T\d{4}(\.\d{3})?",
        )
        .unwrap()
    }

    #[test]
    fn sort_directive_requires_a_declared_field() {
        let d = descriptor();
        assert_eq!(sort_directive(Some("name"), &d), Some(("name", false)));
        assert_eq!(sort_directive(Some("-name"), &d), Some(("name", true)));
        assert_eq!(sort_directive(Some("bogus"), &d), None);
        assert_eq!(sort_directive(Some("-bogus"), &d), None);
        assert_eq!(sort_directive(Some(""), &d), None);
        assert_eq!(sort_directive(None, &d), None);
    }

    #[test]
    fn sorting_orders_by_field_text() {
        let mut records = vec![
            Record::new("T1059", "Command Interpreter"),
            Record::new("T1566", "Phishing"),
            Record::new("T1003", "credential Dumping"),
        ];
        sort_records(&mut records, "name", false);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Command Interpreter", "credential Dumping", "Phishing"]
        );

        sort_records(&mut records, "mitre_id", true);
        assert_eq!(records[0].mitre_id, "T1566");
    }

    #[test]
    fn pagination_slices_at_fixed_size() {
        let records: Vec<Record> = (0..45)
            .map(|i| Record::new(format!("T{:04}", 1000 + i), format!("Technique {i}")))
            .collect();
        let page = Page::paginate(records.clone(), 3, PAGE_SIZE).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_records, 45);
        assert_eq!(page.records.len(), 5);
        assert!(!page.has_next());
        assert!(page.has_previous());

        assert!(matches!(
            Page::paginate(records.clone(), 4, PAGE_SIZE),
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            Page::paginate(records, 0, PAGE_SIZE),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn empty_collections_still_have_a_first_page() {
        let page = Page::paginate(Vec::new(), 1, PAGE_SIZE).unwrap();
        assert_eq!(page.total_pages, 1);
        assert!(page.records.is_empty());
    }

    #[test]
    fn sort_state_cycles_asc_desc_none() {
        assert_eq!(sort_state(None, "name")["next_order_value"], "name");
        assert_eq!(sort_state(Some("name"), "name")["sort_order"], "asc");
        assert_eq!(
            sort_state(Some("name"), "name")["next_order_value"],
            "-name"
        );
        assert_eq!(sort_state(Some("-name"), "name")["sort_order"], "desc");
        assert_eq!(sort_state(Some("-name"), "name")["next_order_value"], "");
        assert_eq!(sort_state(Some("mitre_id"), "name")["sort_order"], "");
    }
}
