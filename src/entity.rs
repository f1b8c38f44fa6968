//! Entity descriptors: the per-type configuration the route composer and
//! the listing/detail engines work from.
//!
//! A descriptor identifies one browsable record type (technique, group, ...)
//! and carries its displayable fields, human titles, and the identifier
//! pattern that constrains how canonical IDs look in URLs.

use regex::Regex;

use crate::error::ConfigError;

/// One displayable field of an entity.
///
/// `filter_field` names the record field that user-supplied criteria for
/// this field actually match against (`short_description` filters against
/// the full `description` text). `None` means the field is displayable but
/// not independently filterable.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub filter_field: Option<&'static str>,
}

impl FieldSpec {
    /// A field filterable against its own value.
    pub fn filterable(name: &'static str) -> Self {
        Self {
            name,
            filter_field: Some(name),
        }
    }

    /// A field whose criteria match against a different record field.
    pub fn filter_via(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            filter_field: Some(target),
        }
    }

    /// A field shown in listings but not independently filterable.
    pub fn display_only(name: &'static str) -> Self {
        Self {
            name,
            filter_field: None,
        }
    }
}

/// Configuration describing one browsable entity type.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    /// Lowercase model name used in URL paths and route names.
    pub model_name: &'static str,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
    pub fields: Vec<FieldSpec>,
    /// Identifier-format matcher. Entity specific: technique IDs carry an
    /// optional sub-technique suffix, data source IDs a two-letter prefix.
    id_pattern: Regex,
    /// Raw pattern text, kept for route bundle reporting.
    id_pattern_source: String,
}

impl EntityDescriptor {
    /// Registration-time constructor; an uncompilable identifier pattern is
    /// a configuration error, reported through the same channel the route
    /// composer aborts on.
    pub fn new(
        model_name: &'static str,
        verbose_name: &'static str,
        verbose_name_plural: &'static str,
        fields: Vec<FieldSpec>,
        id_pattern: &str,
    ) -> Result<Self, ConfigError> {
        // Anchor the pattern so partial matches never count as valid IDs.
        let anchored = format!("^(?:{id_pattern})$");
        let compiled = Regex::new(&anchored).map_err(|e| ConfigError::InvalidIdPattern {
            entity: model_name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            model_name,
            verbose_name,
            verbose_name_plural,
            fields,
            id_pattern: compiled,
            id_pattern_source: id_pattern.to_string(),
        })
    }

    /// Conventional route name: `<entity-model-name>_<action>`.
    pub fn url_name(&self, action: &str) -> String {
        format!("{}_{}", self.model_name, action)
    }

    pub fn id_pattern(&self) -> &str {
        &self.id_pattern_source
    }

    /// The compiled, anchored identifier matcher.
    pub fn id_regex(&self) -> &Regex {
        &self.id_pattern
    }

    /// Whether `id` is a well-formed canonical identifier for this entity.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id_pattern.is_match(id)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// The record field criteria on `name` match against, if filterable.
    pub fn filter_field(&self, name: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.filter_field)
    }

    /// Fields that can appear in filter criteria.
    pub fn filterable_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.filter_field.is_some())
    }
}
