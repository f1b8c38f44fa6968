//! Reverse-URL map for composed routes.
//!
//! Route names follow the `<entity-model-name>_<action>` convention and are
//! unique within their namespace; inserting a duplicate is a
//! registration-time conflict.

use std::collections::HashMap;

use regex::Regex;

use crate::error::ConfigError;

/// Placeholder used in detail URL templates.
const ID_PLACEHOLDER: &str = "{mitre_id}";

#[derive(Debug)]
struct UrlEntry {
    /// Concrete path, or a template containing `{mitre_id}`.
    template: String,
    /// Present for detail routes: the entity's identifier pattern.
    id_pattern: Option<Regex>,
}

/// Name → URL table for one namespace.
#[derive(Debug, Default)]
pub struct UrlMap {
    namespace: String,
    entries: HashMap<String, UrlEntry>,
}

impl UrlMap {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub(crate) fn insert(&mut self, name: &str, path: String) -> Result<(), ConfigError> {
        self.insert_entry(name, path, None)
    }

    pub(crate) fn insert_with_id(
        &mut self,
        name: &str,
        template: String,
        id_pattern: Regex,
    ) -> Result<(), ConfigError> {
        self.insert_entry(name, template, Some(id_pattern))
    }

    fn insert_entry(
        &mut self,
        name: &str,
        template: String,
        id_pattern: Option<Regex>,
    ) -> Result<(), ConfigError> {
        if self.entries.contains_key(name) {
            return Err(ConfigError::DuplicateRouteName {
                namespace: self.namespace.clone(),
                name: name.to_string(),
            });
        }
        self.entries.insert(
            name.to_string(),
            UrlEntry {
                template,
                id_pattern,
            },
        );
        Ok(())
    }

    /// Resolve a route name without arguments.
    pub fn reverse(&self, name: &str) -> Result<String, ConfigError> {
        let entry = self.entry(name)?;
        Ok(entry.template.clone())
    }

    /// Resolve a detail route name for a concrete identifier. The identifier
    /// must match the entity's declared pattern.
    pub fn reverse_with_id(&self, name: &str, id: &str) -> Result<String, ConfigError> {
        let entry = self.entry(name)?;
        if let Some(pattern) = &entry.id_pattern {
            if !pattern.is_match(id) {
                return Err(ConfigError::IdentifierMismatch {
                    name: name.to_string(),
                    id: id.to_string(),
                });
            }
        }
        Ok(entry.template.replace(ID_PLACEHOLDER, id))
    }

    fn entry(&self, name: &str) -> Result<&UrlEntry, ConfigError> {
        self.entries.get(name).ok_or_else(|| ConfigError::UnknownRouteName {
            namespace: self.namespace.clone(),
            name: name.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Build the detail URL template for an entity path prefix.
pub(crate) fn detail_template(prefix: &str) -> String {
    format!("{prefix}detail/{ID_PLACEHOLDER}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> UrlMap {
        let mut map = UrlMap::new("attack");
        map.insert("technique_index", "/attack/technique/".into())
            .unwrap();
        map.insert_with_id(
            "technique_detail",
            detail_template("/attack/technique/"),
            Regex::new(r"^(?:T\d{4}(\.\d{3})?)$").unwrap(),
        )
        .unwrap();
        map
    }

    #[test]
    fn duplicate_names_conflict_at_registration() {
        let mut map = map();
        let err = map
            .insert("technique_index", "/attack/technique/".into())
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRouteName { .. }));
    }

    #[test]
    fn reverse_with_id_validates_against_the_pattern() {
        let map = map();
        assert_eq!(
            map.reverse_with_id("technique_detail", "T1566.001").unwrap(),
            "/attack/technique/detail/T1566.001/"
        );
        assert!(matches!(
            map.reverse_with_id("technique_detail", "G0007"),
            Err(ConfigError::IdentifierMismatch { .. })
        ));
    }

    #[test]
    fn unknown_names_are_reported_with_their_namespace() {
        let map = map();
        match map.reverse("software_index") {
            Err(ConfigError::UnknownRouteName { namespace, name }) => {
                assert_eq!(namespace, "attack");
                assert_eq!(name, "software_index");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
