//! ATT&CK catalog registrations: one entity descriptor, detail layout, and
//! (where hand-tuned) index/filterset override per browsable type.

pub mod patterns;

use crate::entity::{EntityDescriptor, FieldSpec};
use crate::error::ConfigError;
use crate::routes::{
    compose_routes, ComposedRoutes, ComposerDefaults, EntityRegistration, Namespace, ViewWrapper,
};
use crate::views::detail::DetailViewConfig;
use crate::views::listing::IndexViewConfig;

pub fn namespace() -> Namespace {
    Namespace {
        name: "attack",
        prefix: "/attack",
        title: "MITRE ATT&CK",
    }
}

/// The listing fields shared by every ATT&CK entity. `short_description`
/// filters against the full description text; `collection` is shown but
/// not independently filterable.
fn base_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::filterable("mitre_id"),
        FieldSpec::filterable("name"),
        FieldSpec::filter_via("short_description", "description"),
        FieldSpec::display_only("collection"),
    ]
}

fn base_detail() -> DetailViewConfig {
    DetailViewConfig::new(vec!["mitre_id", "name", "short_description"])
}

pub fn registrations() -> Result<Vec<EntityRegistration>, ConfigError> {
    let mut technique_fields = base_fields();
    // Techniques can be narrowed by tactic; the option stays out of the
    // flat filter form.
    technique_fields.push(FieldSpec::filterable("tactic"));

    Ok(vec![
        EntityRegistration::new(
            EntityDescriptor::new(
                "technique",
                "Technique",
                "Techniques",
                technique_fields,
                patterns::TECHNIQUE_ID_PATTERN,
            )?,
            base_detail(),
        )
        .with_index(IndexViewConfig {
            hidden_filter_fields: vec!["tactic"],
        }),
        EntityRegistration::new(
            EntityDescriptor::new(
                "tactic",
                "Tactic",
                "Tactics",
                base_fields(),
                patterns::TACTIC_ID_PATTERN,
            )?,
            base_detail(),
        ),
        EntityRegistration::new(
            EntityDescriptor::new(
                "group",
                "Group",
                "Groups",
                base_fields(),
                patterns::GROUP_ID_PATTERN,
            )?,
            DetailViewConfig::new(vec!["mitre_id", "name", "short_description", "aliases"]),
        ),
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
                "mitigation",
                "Mitigation",
                "Mitigations",
                base_fields(),
                patterns::MITIGATION_ID_PATTERN,
            )?,
            base_detail(),
        ),
        EntityRegistration::new(
            EntityDescriptor::new(
                "datasource",
                "Data Source",
                "Data Sources",
                base_fields(),
                patterns::DATASOURCE_ID_PATTERN,
            )?,
            base_detail(),
        ),
        EntityRegistration::new(
            EntityDescriptor::new(
                "campaign",
                "Campaign",
                "Campaigns",
                base_fields(),
                patterns::CAMPAIGN_ID_PATTERN,
            )?,
            base_detail(),
        ),
        // Matrices are also addressed directly by collection shortname.
        EntityRegistration::new(
            EntityDescriptor::new(
                "matrix",
                "Matrix",
                "Matrices",
                base_fields(),
                patterns::MATRIX_ID_PATTERN,
            )?,
            base_detail(),
        )
        .with_collection_detail(),
    ])
}

/// Compose the full ATT&CK namespace with the generic defaults.
pub fn compose(wrapper: ViewWrapper) -> Result<ComposedRoutes, ConfigError> {
    compose_routes(
        &namespace(),
        registrations()?,
        ComposerDefaults::default(),
        wrapper,
    )
}
