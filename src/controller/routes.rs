use axum::{routing::MethodRouter, Router};

use crate::app::AppContext;

/// Route registered by a controller.
#[derive(Clone)]
pub struct Handler {
    pub uri: String,
    pub method: MethodRouter<AppContext>,
}

/// Group of routes contributed by one controller, optionally under a shared
/// prefix.
#[derive(Clone, Default)]
pub struct Routes {
    pub prefix: Option<String>,
    pub handlers: Vec<Handler>,
}

impl Routes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefixes every route added to this group.
    #[must_use]
    pub fn prefix(mut self, uri: &str) -> Self {
        self.prefix = Some(uri.trim_end_matches('/').to_string());
        self
    }

    /// Adds a route.
    #[must_use]
    pub fn add(mut self, uri: &str, method: MethodRouter<AppContext>) -> Self {
        let uri = match &self.prefix {
            Some(prefix) => format!("{prefix}{uri}"),
            None => uri.to_string(),
        };
        self.handlers.push(Handler { uri, method });
        self
    }

    /// Registers every route on `router`.
    pub fn mount(self, router: Router<AppContext>) -> Router<AppContext> {
        self.handlers.into_iter().fold(router, |router, handler| {
            tracing::debug!(uri = handler.uri.as_str(), "route_registered");
            router.route(&handler.uri, handler.method)
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;

    use super::*;

    async fn noop() {}

    #[test]
    fn prefix_applies_to_added_routes() {
        let routes = Routes::new()
            .prefix("/search/")
            .add("/prefix", get(noop))
            .add("/label", get(noop));
        let uris: Vec<_> = routes.handlers.iter().map(|h| h.uri.as_str()).collect();
        assert_eq!(uris, ["/search/prefix", "/search/label"]);
    }
}
