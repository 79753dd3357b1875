use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppContext,
    controller::{format, Routes},
    ontology::{entities::OwlClass, traversal::Category},
    Result,
};

#[derive(Debug, Default, Deserialize)]
pub struct DepthParams {
    pub max_depth: Option<usize>,
}

/// List payload shared by taxonomy listings and prefix search.
#[derive(Serialize)]
pub struct ClassList<'a> {
    pub classes: &'a [Arc<OwlClass>],
}

/// Lists a category and its descendants.
///
/// # Errors
/// Unknown category slugs are rejected with a bad request.
pub async fn list(
    State(ctx): State<AppContext>,
    Path(category): Path<String>,
    Query(params): Query<DepthParams>,
) -> Result<Response> {
    let category: Category = category.parse()?;
    let max_depth = params
        .max_depth
        .unwrap_or(ctx.config.search.taxonomy_default_depth);
    let classes = ctx.ontology.categorize(category, max_depth)?;
    format::json(ClassList { classes: &classes })
}

pub fn routes() -> Routes {
    Routes::new().prefix("/taxonomy").add("/{category}", get(list))
}
