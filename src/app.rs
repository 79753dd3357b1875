//! Application context shared by controllers and the command line, and the
//! HTTP server lifecycle.

use std::{sync::Arc, time::Duration};

use tracing::info;

use crate::{
    ai::{build_scorer, Scorer, SemanticSearchOrchestrator},
    config::Config,
    controller,
    environment::Environment,
    ontology::service::OntologyService,
    Error, Result,
};

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    /// Environment the application was booted in.
    pub environment: Environment,
    /// Loaded configuration.
    pub config: Config,
    /// Ontology lookups, traversal and lexical search.
    pub ontology: OntologyService,
    /// Semantic scorer, when one is configured.
    pub scorer: Option<Arc<dyn Scorer>>,
}

impl AppContext {
    /// Loads the ontology and builds the configured scorer.
    ///
    /// # Errors
    /// Fails when the ontology snapshot cannot be loaded or the scorer
    /// configuration is invalid.
    pub async fn boot(environment: Environment, config: Config) -> Result<Self> {
        let ontology = OntologyService::from_config(&config.ontology).await?;
        let scorer = build_scorer(&config.ai)?;
        let classes = ontology.class_count()?;
        info!(
            environment = %environment,
            classes,
            scorer = scorer.is_some(),
            "app_booted"
        );
        Ok(Self {
            environment,
            config,
            ontology,
            scorer,
        })
    }

    /// Semantic search orchestrator bound to the configured scorer and timeout.
    ///
    /// # Errors
    /// Returns [`Error::ScorerNotConfigured`] when no scorer is configured.
    pub fn semantic_search(&self) -> Result<SemanticSearchOrchestrator> {
        let scorer = self.scorer.clone().ok_or(Error::ScorerNotConfigured)?;
        Ok(SemanticSearchOrchestrator::new(self.ontology.clone(), scorer)
            .with_timeout(Duration::from_secs(self.config.ai.timeout_secs)))
    }
}

/// Serves the HTTP routes until a shutdown signal arrives.
///
/// # Errors
/// Fails when the listener cannot bind or the server stops with an error.
pub async fn serve(ctx: AppContext) -> Result<()> {
    let address = format!("{}:{}", ctx.config.server.binding, ctx.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = address.as_str(), url = ctx.config.server.full_url(), "server_listening");

    axum::serve(listener, controller::router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(err.msg = %error, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(err.msg = %error, "terminate_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("server_shutdown");
}
