//! HTTP controllers.
//!
//! Handlers are thin: they parse the request, call into the ontology service
//! or the semantic search orchestrator, and render JSON. Every route shares
//! the [`AppContext`] state and is wrapped with CORS and request tracing.

use axum::{http::HeaderValue, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{app::AppContext, config};

pub mod class;
pub mod format;
pub mod info;
pub mod routes;
pub mod search;
pub mod taxonomy;

pub use routes::Routes;

/// Every route group, in registration order.
#[must_use]
pub fn app_routes() -> Vec<Routes> {
    vec![
        info::routes(),
        taxonomy::routes(),
        search::routes(),
        class::routes(),
    ]
}

/// Builds the application router.
pub fn router(ctx: AppContext) -> Router {
    let cors = cors_layer(&ctx.config.server);
    app_routes()
        .into_iter()
        .fold(Router::new(), |router, routes| routes.mount(router))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

fn cors_layer(server: &config::Server) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if server.cors_origins.is_empty() || server.cors_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(err.msg = %error, origin = origin.as_str(), "cors_origin_ignored");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
