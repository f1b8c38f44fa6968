//! Route composition: endpoint derivation, reverse-URL lookup, and the
//! identifier redirect.

pub mod composer;
pub mod redirect;
pub mod urls;

pub use composer::{
    compose_routes, passthrough_wrapper, ComposedRoutes, ComposerDefaults, EntityRegistration,
    Namespace, RouteBundle, RouteEndpoint, ViewWrapper,
};
pub use urls::UrlMap;
