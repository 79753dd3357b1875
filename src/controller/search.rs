//! Lexical and semantic search routes.
//!
//! Queries outside the accepted length bounds answer with an empty list.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppContext,
    controller::{format, taxonomy::ClassList, Routes},
    ontology::traversal::Category,
    search::SearchResult,
    Result,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SemanticParams {
    pub query: String,
    pub max_depth: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResults {
    pub results: Vec<SearchResult>,
}

pub async fn prefix(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let classes = ctx.ontology.search().by_prefix(&params.query)?;
    format::json(ClassList { classes: &classes })
}

pub async fn label(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let results = ctx.ontology.search().by_label(&params.query)?;
    format::json(SearchResults { results })
}

pub async fn definition(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let results = ctx.ontology.search().by_definition(&params.query)?;
    format::json(SearchResults { results })
}

/// Ranks a category's classes with the configured scorer.
///
/// # Errors
/// * unknown category: bad request
/// * no scorer configured: not implemented
/// * scorer failure or timeout: service unavailable
pub async fn semantic(
    State(ctx): State<AppContext>,
    Path(category): Path<String>,
    Query(params): Query<SemanticParams>,
) -> Result<Response> {
    let category: Category = category.parse()?;
    let max_depth = params
        .max_depth
        .unwrap_or(ctx.config.search.semantic_default_depth);
    let results = ctx
        .semantic_search()?
        .search(category, &params.query, max_depth)
        .await?;
    format::json(SearchResults { results })
}

pub fn routes() -> Routes {
    Routes::new()
        .prefix("/search")
        .add("/prefix", get(prefix))
        .add("/label", get(label))
        .add("/definition", get(definition))
        .add("/semantic/{category}", get(semantic))
}
