//! The request-scoped record representation handed over by the storage
//! collaborator. Persistence and querying live behind [`crate::store`];
//! the engines only ever see plain `Record` values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One knowledge-base record (a technique, a group, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub mitre_id: String,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    /// Entity-specific fields (aliases, collection, description, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(mitre_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            mitre_id: mitre_id.into(),
            name: name.into(),
            short_description: String::new(),
            deprecated: false,
            revoked: false,
            created: None,
            modified: None,
            extra: Map::new(),
        }
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.short_description = text.into();
        self
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(name.to_string(), value.into());
        self
    }

    pub fn revoked(mut self, flag: bool) -> Self {
        self.revoked = flag;
        self
    }

    pub fn deprecated(mut self, flag: bool) -> Self {
        self.deprecated = flag;
        self
    }

    /// Listings only show current content; revoked and deprecated records
    /// stay reachable through detail pages.
    pub fn is_visible(&self) -> bool {
        !self.deprecated && !self.revoked
    }

    /// Resolve a displayable field by name.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "mitre_id" => Some(Value::String(self.mitre_id.clone())),
            "name" => Some(Value::String(self.name.clone())),
            "short_description" => Some(Value::String(self.short_description.clone())),
            _ => self.extra.get(name).cloned(),
        }
    }

    /// Textual form of a field, used for filter matching and sorting.
    pub fn field_text(&self, name: &str) -> Option<String> {
        match self.field(name)? {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
