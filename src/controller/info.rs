//! Service status routes.

use axum::{extract::State, response::Response, routing::get};
use serde::Serialize;

use crate::{
    app::AppContext,
    controller::{format, Routes},
    Result,
};

#[derive(Serialize)]
pub struct GraphInfo {
    pub num_classes: usize,
    pub title: String,
    pub description: String,
    pub source_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub soli_graph: GraphInfo,
    pub semantic_search: bool,
}

/// Reports the loaded ontology and whether semantic search is available.
///
/// # Errors
/// Fails only when the class store cannot be counted.
pub async fn health(State(ctx): State<AppContext>) -> Result<Response> {
    let metadata = ctx.ontology.metadata();
    format::json(HealthResponse {
        status: "healthy",
        soli_graph: GraphInfo {
            num_classes: ctx.ontology.class_count()?,
            title: metadata.title,
            description: metadata.description,
            source_type: metadata.source_type,
            location: metadata.location,
        },
        semantic_search: ctx.scorer.is_some(),
    })
}

pub fn routes() -> Routes {
    Routes::new().prefix("/info").add("/health", get(health))
}
