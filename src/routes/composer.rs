//! Route composer.
//!
//! Given an entity registration, derives the index/detail/filter endpoint
//! triple, resolving hand-registered view and filterset overrides and
//! synthesizing missing pieces from the generic engines. Overrides live in
//! an explicit registration table resolved at composition time; a missing
//! detail configuration or a duplicate route name aborts composition, so
//! configuration defects never reach request time.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, MethodRouter};
use axum::Form;
use axum::Router;
use serde_json::{json, Value};

use crate::entity::EntityDescriptor;
use crate::error::ConfigError;
use crate::filtering::{FieldFilterSetFactory, FilterSetFactory};
use crate::routes::redirect::redirect_by_id;
use crate::routes::urls::{detail_template, UrlMap};
use crate::state::AppState;
use crate::views::detail::{detail_view, DetailViewConfig};
use crate::views::filter_entry::{filter_entry_view, FilterSubmission};
use crate::views::listing::{listing_view, IndexViewConfig, ListingQuery};
use crate::views::EntityContext;

/// One owning route namespace (e.g. the ATT&CK catalog under `/attack`).
#[derive(Debug, Clone)]
pub struct Namespace {
    pub name: &'static str,
    pub prefix: &'static str,
    pub title: &'static str,
}

/// Hook for cross-cutting concerns (e.g. permission checks) applied to
/// every composed view. Invoked with the view, the entity (absent for
/// namespace-level views), the action name, and the route name. The
/// default is a pass-through.
pub type ViewWrapper = Arc<
    dyn Fn(MethodRouter<AppState>, Option<&EntityDescriptor>, &str, &str) -> MethodRouter<AppState>
        + Send
        + Sync,
>;

pub fn passthrough_wrapper() -> ViewWrapper {
    Arc::new(|view, _model, _name, _url_name| view)
}

/// Per-entity registration table entry. `detail` is required — detail
/// rendering needs an entity-specific field layout and has no generic
/// fallback. `index` and `filterset` fall back to the generic engines.
pub struct EntityRegistration {
    pub descriptor: EntityDescriptor,
    pub detail: Option<DetailViewConfig>,
    pub index: Option<IndexViewConfig>,
    pub filterset: Option<Arc<dyn FilterSetFactory>>,
    /// Also expose the detail page directly under the entity prefix,
    /// addressed by collection shortname (matrices are browsed this way).
    pub collection_detail: bool,
}

impl EntityRegistration {
    pub fn new(descriptor: EntityDescriptor, detail: DetailViewConfig) -> Self {
        Self {
            descriptor,
            detail: Some(detail),
            index: None,
            filterset: None,
            collection_detail: false,
        }
    }

    pub fn with_index(mut self, index: IndexViewConfig) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_filterset(mut self, filterset: Arc<dyn FilterSetFactory>) -> Self {
        self.filterset = Some(filterset);
        self
    }

    pub fn with_collection_detail(mut self) -> Self {
        self.collection_detail = true;
        self
    }
}

/// Composition-time defaults for pieces a registration does not override.
pub struct ComposerDefaults {
    pub filterset: Arc<dyn FilterSetFactory>,
}

impl Default for ComposerDefaults {
    fn default() -> Self {
        Self {
            filterset: Arc::new(FieldFilterSetFactory),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteEndpoint {
    pub name: String,
    pub action: &'static str,
    pub path: String,
}

/// The three derived endpoints for one entity.
#[derive(Debug, Clone)]
pub struct RouteBundle {
    pub entity: &'static str,
    pub endpoints: Vec<RouteEndpoint>,
}

/// Result of composing a namespace: the router, the reverse-URL map, and
/// the per-entity bundles for inspection.
#[derive(Debug)]
pub struct ComposedRoutes {
    pub router: Router<AppState>,
    pub urls: Arc<UrlMap>,
    pub bundles: Vec<RouteBundle>,
}

pub fn compose_routes(
    namespace: &Namespace,
    registrations: Vec<EntityRegistration>,
    defaults: ComposerDefaults,
    wrapper: ViewWrapper,
) -> Result<ComposedRoutes, ConfigError> {
    let wrap = wrapper.as_ref();
    let ns_prefix = namespace.prefix.trim_end_matches('/');
    let ns_index_path = format!("{ns_prefix}/");

    // The full name table is built up front so every handler can share
    // one immutable map; name conflicts surface before any route exists.
    let mut urls = UrlMap::new(namespace.name);
    urls.insert("index", ns_index_path.clone())?;
    for registration in &registrations {
        let descriptor = &registration.descriptor;
        let entity_prefix = format!("{ns_prefix}/{}/", descriptor.model_name);
        urls.insert(&descriptor.url_name("index"), entity_prefix.clone())?;
        urls.insert_with_id(
            &descriptor.url_name("detail"),
            detail_template(&entity_prefix),
            descriptor.id_regex().clone(),
        )?;
        urls.insert(
            &descriptor.url_name("filter"),
            format!("{entity_prefix}filter/"),
        )?;
        if registration.collection_detail {
            urls.insert_with_id(
                &descriptor.url_name("detail_by_collection"),
                format!("{entity_prefix}{{mitre_id}}/"),
                descriptor.id_regex().clone(),
            )?;
        }
    }
    let urls = Arc::new(urls);

    let mut router: Router<AppState> = Router::new();
    let mut bundles = Vec::with_capacity(registrations.len());
    let mut descriptors = Vec::with_capacity(registrations.len());
    let mut entity_links = Vec::with_capacity(registrations.len());

    for registration in registrations {
        let descriptor = registration.descriptor;
        let detail = registration
            .detail
            .ok_or_else(|| ConfigError::MissingDetailView {
                entity: descriptor.model_name.to_string(),
            })?;

        let entity_prefix = format!("{ns_prefix}/{}/", descriptor.model_name);
        let index_name = descriptor.url_name("index");
        let detail_name = descriptor.url_name("detail");
        let filter_name = descriptor.url_name("filter");

        entity_links.push(json!({
            "entity": descriptor.model_name,
            "title": descriptor.verbose_name_plural,
            "listing_url": entity_prefix,
        }));
        descriptors.push(descriptor.clone());

        let ctx = Arc::new(EntityContext {
            catalog: namespace.name,
            descriptor,
            detail,
            index: registration.index.unwrap_or_default(),
            filterset: registration
                .filterset
                .unwrap_or_else(|| defaults.filterset.clone()),
            urls: urls.clone(),
        });

        // Index: generic listing engine bound to this entity.
        let index_ctx = ctx.clone();
        let index_view = get(
            move |State(state): State<AppState>, Query(query): Query<ListingQuery>| {
                let ctx = index_ctx.clone();
                async move { listing_view(ctx, state, query).await }
            },
        );
        let index_view = wrap(index_view, Some(&ctx.descriptor), "index", &index_name);
        router = router.route(&entity_prefix, index_view);

        // Detail: single-record engine; the identifier is validated against
        // the entity's pattern inside the handler.
        let detail_path = format!("{entity_prefix}detail/:mitre_id/");
        let detail_ctx = ctx.clone();
        let detail_route = get(
            move |State(state): State<AppState>, Path(mitre_id): Path<String>| {
                let ctx = detail_ctx.clone();
                async move { detail_view(ctx, state, mitre_id).await }
            },
        );
        let detail_route = wrap(detail_route, Some(&ctx.descriptor), "detail", &detail_name);
        router = router.route(&detail_path, detail_route);

        // Filter entry: GET and POST handled identically.
        let filter_path = format!("{entity_prefix}filter/");
        let filter_get_ctx = ctx.clone();
        let filter_post_ctx = ctx.clone();
        let filter_route = get(
            move |State(state): State<AppState>, Query(submission): Query<FilterSubmission>| {
                let ctx = filter_get_ctx.clone();
                async move { filter_entry_view(ctx, state, submission).await }
            },
        )
        .post(
            move |State(state): State<AppState>, Form(submission): Form<FilterSubmission>| {
                let ctx = filter_post_ctx.clone();
                async move { filter_entry_view(ctx, state, submission).await }
            },
        );
        let filter_route = wrap(filter_route, Some(&ctx.descriptor), "filter", &filter_name);
        router = router.route(&filter_path, filter_route);

        let mut endpoints = vec![
            RouteEndpoint {
                name: index_name,
                action: "index",
                path: entity_prefix.clone(),
            },
            RouteEndpoint {
                name: detail_name,
                action: "detail",
                path: detail_path,
            },
            RouteEndpoint {
                name: filter_name,
                action: "filter",
                path: filter_path,
            },
        ];

        // Collection shortname alias: the detail page addressed directly
        // under the entity prefix. Static siblings (filter/, detail/) take
        // routing precedence over the slug segment.
        if registration.collection_detail {
            let collection_name = ctx.descriptor.url_name("detail_by_collection");
            let collection_path = format!("{entity_prefix}:slug/");
            let collection_ctx = ctx.clone();
            let collection_route = get(
                move |State(state): State<AppState>, Path(slug): Path<String>| {
                    let ctx = collection_ctx.clone();
                    async move { detail_view(ctx, state, slug).await }
                },
            );
            let collection_route = wrap(
                collection_route,
                Some(&ctx.descriptor),
                "detail_by_collection",
                &collection_name,
            );
            router = router.route(&collection_path, collection_route);
            endpoints.push(RouteEndpoint {
                name: collection_name,
                action: "detail_by_collection",
                path: collection_path,
            });
        }

        bundles.push(RouteBundle {
            entity: ctx.descriptor.model_name,
            endpoints,
        });
    }

    // Namespace root: lists the browsable entity types.
    let ns_title = namespace.title;
    let ns_name = namespace.name;
    let links = Value::Array(entity_links);
    let ns_index = get(move |State(state): State<AppState>| {
        let links = links.clone();
        async move {
            let context = json!({
                "title": ns_title,
                "entities": links,
                "debug": state.debug,
            });
            state.renderer.render(&format!("{ns_name}/index.html"), &context)
        }
    });
    let ns_index = wrap(ns_index, None, "index", "index");
    router = router.route(&ns_index_path, ns_index);

    // Redirect to the correct entity view based on the mitre id.
    let redirect_path = format!("{ns_prefix}/redirect-id/:mitre_id/");
    let redirect_descriptors = Arc::new(descriptors);
    let redirect_urls = urls.clone();
    let redirect_route = get(move |Path(mitre_id): Path<String>| {
        let descriptors = redirect_descriptors.clone();
        let urls = redirect_urls.clone();
        async move { redirect_by_id(descriptors, urls, mitre_id).await }
    });
    let redirect_route = wrap(redirect_route, None, "redirect", "redirect_by_mitre_id");
    router = router.route(&redirect_path, redirect_route);

    Ok(ComposedRoutes {
        router,
        urls,
        bundles,
    })
}
