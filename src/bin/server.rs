//! Catalog server binary: composes the ATT&CK routes and serves them.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use mitre_catalog::render::ContextRenderer;
use mitre_catalog::routes::passthrough_wrapper;
use mitre_catalog::store::MemoryStore;
use mitre_catalog::{attack, mbc, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mitre_catalog=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let store = match &config.data_file {
        Some(path) => MemoryStore::from_json_file(path)?,
        None => {
            tracing::warn!("DATA_FILE not set; starting with an empty store");
            MemoryStore::new()
        }
    };

    // Routes are composed before serving: configuration errors abort here,
    // never at request time.
    let attack = attack::compose(passthrough_wrapper())?;
    let mbc = mbc::compose(passthrough_wrapper())?;

    let state = AppState::new(Arc::new(store), Arc::new(ContextRenderer), config.debug);
    for bundle in attack.bundles.iter().chain(mbc.bundles.iter()) {
        for endpoint in &bundle.endpoints {
            tracing::debug!(name = %endpoint.name, path = %endpoint.path, "registered route");
        }
    }

    // Root page lists the mounted catalogs.
    let catalogs = json!([
        {"title": "Mitre Att&ck", "url": "/attack/"},
        {"title": "Mitre MBC", "url": "/mbc/"},
    ]);
    let root = get(move |State(state): State<AppState>| {
        let catalogs = catalogs.clone();
        async move {
            let context = json!({
                "title": "MITRE",
                "catalogs": catalogs,
                "debug": state.debug,
            });
            state.renderer.render("core/index.html", &context)
        }
    });

    let app = attack
        .router
        .merge(mbc.router)
        .route("/", root)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        );

    info!("Starting catalog server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
