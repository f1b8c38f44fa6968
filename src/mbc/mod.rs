//! MBC catalog registrations: the malware behavior catalog browses the
//! same way as ATT&CK, with its own namespace, identifier shapes, and a
//! smaller entity subset.

pub mod patterns;

use crate::entity::{EntityDescriptor, FieldSpec};
use crate::error::ConfigError;
use crate::routes::{
    compose_routes, ComposedRoutes, ComposerDefaults, EntityRegistration, Namespace, ViewWrapper,
};
use crate::views::detail::DetailViewConfig;

pub fn namespace() -> Namespace {
    Namespace {
        name: "mbc",
        prefix: "/mbc",
        title: "Mitre MBC",
    }
}

fn base_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::filterable("mitre_id"),
        FieldSpec::filterable("name"),
        FieldSpec::filter_via("short_description", "description"),
    ]
}

fn base_detail() -> DetailViewConfig {
    DetailViewConfig::new(vec!["mitre_id", "name", "short_description"])
}

pub fn registrations() -> Result<Vec<EntityRegistration>, ConfigError> {
    Ok(vec![
        EntityRegistration::new(
            EntityDescriptor::new(
                "software",
                "Software",
                "Software",
                base_fields(),
                patterns::SOFTWARE_ID_PATTERN,
            )?,
            base_detail(),
        ),
        EntityRegistration::new(
            EntityDescriptor::new(
                "tactic",
                "Objective",
                "Objectives",
                base_fields(),
                patterns::TACTIC_ID_PATTERN,
            )?,
            base_detail(),
        ),
        EntityRegistration::new(
            EntityDescriptor::new(
                "technique",
                "Behavior",
                "Behaviors",
                base_fields(),
                patterns::TECHNIQUE_ID_PATTERN,
            )?,
            base_detail(),
        ),
    ])
}

/// Compose the full MBC namespace with the generic defaults.
pub fn compose(wrapper: ViewWrapper) -> Result<ComposedRoutes, ConfigError> {
    compose_routes(
        &namespace(),
        registrations()?,
        ComposerDefaults::default(),
        wrapper,
    )
}
