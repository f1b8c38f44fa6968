//! Filter state codec.
//!
//! Filter criteria travel through URLs as a single `q` query parameter
//! holding compact JSON. Empty criteria encode to the *absence* of the
//! parameter, so "no filter" URLs stay clean and "is filtered" is a simple
//! presence check.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Structured "narrow results by ..." value. Opaque to the engines; only
/// the filterset capability interprets its contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria(Value);

impl Criteria {
    pub fn empty() -> Self {
        Criteria(Value::Null)
    }

    pub fn from_value(value: Value) -> Self {
        Criteria(value)
    }

    /// Absent, null, and zero-condition criteria are all "no filtering".
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Serialize criteria for use as a query-string value.
///
/// Returns `None` for empty criteria: the parameter must be omitted
/// entirely, not sent as an empty token.
pub fn encode(criteria: &Criteria) -> Option<String> {
    if criteria.is_empty() {
        return None;
    }
    // Criteria is plain JSON data; serialization cannot fail.
    Some(criteria.0.to_string())
}

/// Decode the `q` parameter back into criteria.
///
/// A missing parameter is empty criteria. A malformed token is a
/// validation failure surfaced to the caller; silently dropping filters
/// the user explicitly supplied would hide their mistake.
pub fn decode(raw: Option<&str>) -> Result<Criteria, ValidationError> {
    let Some(raw) = raw else {
        return Ok(Criteria::empty());
    };
    serde_json::from_str(raw)
        .map(Criteria)
        .map_err(|e| ValidationError::MalformedCriteria(e.to_string()))
}
