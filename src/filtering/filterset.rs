//! Filterset capability.
//!
//! The engines depend on the [`FilterSet`] contract, never on the criteria's
//! internal structure. A per-entity filterset may be hand-registered with the
//! route composer; when absent, [`FieldFilterSetFactory`] synthesizes one
//! from the entity's declared fields.

use serde_json::{json, Value};

use crate::entity::EntityDescriptor;
use crate::error::ValidationError;
use crate::filtering::codec::Criteria;
use crate::record::Record;

/// A constructed, validated filter ready to narrow a collection.
pub trait FilterSet: Send + Sync {
    /// Narrow the collection to records matching the criteria.
    fn filter(&self, records: Vec<Record>) -> Vec<Record>;

    /// Human-oriented description of the available filter options.
    fn filtering_options_schema(&self) -> Value;

    /// Structured schema a client-side renderer can consume.
    fn json_schema(&self) -> Value;
}

/// Builds a filterset for an entity from decoded criteria. Construction
/// validates the criteria; malformed values never produce a filterset.
pub trait FilterSetFactory: Send + Sync {
    fn build(
        &self,
        descriptor: &EntityDescriptor,
        criteria: Criteria,
    ) -> Result<Box<dyn FilterSet>, ValidationError>;
}

/// Filter operation on a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Case-insensitive substring match.
    Contains,
    /// Exact string match.
    Exact,
}

impl FilterOp {
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "contains" => Ok(FilterOp::Contains),
            "exact" => Ok(FilterOp::Exact),
            other => Err(ValidationError::UnknownOp(other.to_string())),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Contains => "contains",
            FilterOp::Exact => "exact",
        }
    }

    fn matches(&self, haystack: &str, needle: &str) -> bool {
        match self {
            FilterOp::Contains => haystack.to_lowercase().contains(&needle.to_lowercase()),
            FilterOp::Exact => haystack == needle,
        }
    }
}

#[derive(Debug, Clone)]
struct Condition {
    /// Record field the match runs against.
    target: &'static str,
    op: FilterOp,
    value: String,
}

/// Generic filterset synthesized from an entity's declared fields.
///
/// Criteria shape: a JSON array of `{"field", "op", "value"}` objects,
/// all of which must hold for a record to pass.
#[derive(Debug)]
pub struct FieldFilterSet {
    conditions: Vec<Condition>,
    options: Vec<FilterOption>,
}

#[derive(Debug, Clone)]
struct FilterOption {
    field: &'static str,
    target: &'static str,
}

impl FieldFilterSet {
    pub fn build(
        descriptor: &EntityDescriptor,
        criteria: Criteria,
    ) -> Result<Self, ValidationError> {
        let conditions = parse_conditions(descriptor, &criteria)?;
        let options = descriptor
            .filterable_fields()
            .map(|f| FilterOption {
                field: f.name,
                target: f.filter_field.unwrap_or(f.name),
            })
            .collect();
        Ok(Self {
            conditions,
            options,
        })
    }
}

fn parse_conditions(
    descriptor: &EntityDescriptor,
    criteria: &Criteria,
) -> Result<Vec<Condition>, ValidationError> {
    let value = criteria.as_value();
    let single;
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items.as_slice(),
        // A bare condition object is accepted as a one-element list.
        Value::Object(_) => {
            single = [value.clone()];
            &single[..]
        }
        _ => return Err(ValidationError::CriteriaShape),
    };

    let mut conditions = Vec::with_capacity(items.len());
    for item in items {
        let obj = item.as_object().ok_or(ValidationError::ConditionShape)?;
        let field = obj
            .get("field")
            .and_then(Value::as_str)
            .ok_or(ValidationError::ConditionShape)?;
        let op = obj
            .get("op")
            .and_then(Value::as_str)
            .ok_or(ValidationError::ConditionShape)?;
        let value = obj
            .get("value")
            .and_then(Value::as_str)
            .ok_or(ValidationError::ConditionShape)?;

        let target = descriptor
            .filter_field(field)
            .ok_or_else(|| ValidationError::UnknownField(field.to_string()))?;

        conditions.push(Condition {
            target,
            op: FilterOp::parse(op)?,
            value: value.to_string(),
        });
    }
    Ok(conditions)
}

impl FilterSet for FieldFilterSet {
    fn filter(&self, records: Vec<Record>) -> Vec<Record> {
        records
            .into_iter()
            .filter(|record| {
                self.conditions.iter().all(|cond| {
                    record
                        .field_text(cond.target)
                        .map(|text| cond.op.matches(&text, &cond.value))
                        .unwrap_or(false)
                })
            })
            .collect()
    }

    fn filtering_options_schema(&self) -> Value {
        Value::Array(
            self.options
                .iter()
                .map(|opt| {
                    json!({
                        "field": opt.field,
                        "matches": opt.target,
                        "operations": [FilterOp::Contains.as_str(), FilterOp::Exact.as_str()],
                    })
                })
                .collect(),
        )
    }

    fn json_schema(&self) -> Value {
        let fields: Vec<&str> = self.options.iter().map(|opt| opt.field).collect();
        json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "field": { "enum": fields },
                    "op": { "enum": [FilterOp::Contains.as_str(), FilterOp::Exact.as_str()] },
                    "value": { "type": "string" },
                },
                "required": ["field", "op", "value"],
            },
        })
    }
}

/// Default factory: synthesizes a [`FieldFilterSet`] per entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldFilterSetFactory;

impl FilterSetFactory for FieldFilterSetFactory {
    fn build(
        &self,
        descriptor: &EntityDescriptor,
        criteria: Criteria,
    ) -> Result<Box<dyn FilterSet>, ValidationError> {
        Ok(Box::new(FieldFilterSet::build(descriptor, criteria)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FieldSpec;
    use serde_json::json;

    fn descriptor() -> EntityDescriptor {
        EntityDescriptor::new(
            "technique",
            "Technique",
            "Techniques",
            vec![
                FieldSpec::filterable("mitre_id"),
                FieldSpec::filterable("name"),
                FieldSpec::filter_via("short_description", "description"),
                FieldSpec::display_only("collection"),
            ],
            r"T\d{4}(\.\d{3})?",
        )
        .unwrap()
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new("T1566", "Phishing").with_field("description", "Adversaries send phishing messages"),
            Record::new("T1059", "Command and Scripting Interpreter")
                .with_field("description", "Abuse of command interpreters"),
        ]
    }

    fn criteria(value: Value) -> Criteria {
        Criteria::from_value(value)
    }

    #[test]
    fn contains_condition_narrows_case_insensitively() {
        let fs = FieldFilterSet::build(
            &descriptor(),
            criteria(json!([{"field": "name", "op": "contains", "value": "PHISH"}])),
        )
        .unwrap();
        let result = fs.filter(records());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].mitre_id, "T1566");
    }

    #[test]
    fn filter_via_fields_match_against_their_target() {
        let fs = FieldFilterSet::build(
            &descriptor(),
            criteria(
                json!([{"field": "short_description", "op": "contains", "value": "interpreters"}]),
            ),
        )
        .unwrap();
        let result = fs.filter(records());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].mitre_id, "T1059");
    }

    #[test]
    fn conditions_are_conjunctive() {
        let fs = FieldFilterSet::build(
            &descriptor(),
            criteria(json!([
                {"field": "name", "op": "contains", "value": "phish"},
                {"field": "mitre_id", "op": "exact", "value": "T1059"},
            ])),
        )
        .unwrap();
        assert!(fs.filter(records()).is_empty());
    }

    #[test]
    fn display_only_fields_are_rejected() {
        let err = FieldFilterSet::build(
            &descriptor(),
            criteria(json!([{"field": "collection", "op": "exact", "value": "enterprise"}])),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("collection".into()));
    }

    #[test]
    fn a_bare_condition_object_counts_as_one_condition() {
        let fs = FieldFilterSet::build(
            &descriptor(),
            criteria(json!({"field": "name", "op": "contains", "value": "phish"})),
        )
        .unwrap();
        let result = fs.filter(records());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].mitre_id, "T1566");
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        let d = descriptor();
        assert_eq!(
            FieldFilterSet::build(&d, criteria(json!("name"))).unwrap_err(),
            ValidationError::CriteriaShape
        );
        assert_eq!(
            FieldFilterSet::build(&d, criteria(json!({"field": "name"}))).unwrap_err(),
            ValidationError::ConditionShape
        );
        assert_eq!(
            FieldFilterSet::build(&d, criteria(json!(["name"]))).unwrap_err(),
            ValidationError::ConditionShape
        );
        assert_eq!(
            FieldFilterSet::build(
                &d,
                criteria(json!([{"field": "name", "op": "regex", "value": "x"}]))
            )
            .unwrap_err(),
            ValidationError::UnknownOp("regex".into())
        );
    }

    #[test]
    fn schemas_describe_the_filterable_fields() {
        let fs = FieldFilterSet::build(&descriptor(), Criteria::empty()).unwrap();
        let options = fs.filtering_options_schema();
        let fields: Vec<&str> = options
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["mitre_id", "name", "short_description"]);

        let schema = fs.json_schema();
        assert_eq!(schema["type"], "array");
        assert_eq!(
            schema["items"]["properties"]["field"]["enum"],
            json!(["mitre_id", "name", "short_description"])
        );
    }
}
