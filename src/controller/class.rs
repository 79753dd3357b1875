//! Class lookup and neighbor graph routes.
//!
//! `{iri}` is either a local identifier joined to the configured namespace
//! or a percent-encoded absolute IRI.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
};

use crate::{
    app::AppContext,
    controller::{format, Routes},
    Result,
};

pub async fn show(State(ctx): State<AppContext>, Path(iri): Path<String>) -> Result<Response> {
    let class = ctx.ontology.lookup(&iri)?;
    format::json(class.as_ref())
}

pub async fn graph(State(ctx): State<AppContext>, Path(iri): Path<String>) -> Result<Response> {
    format::json(ctx.ontology.neighbors(&iri)?)
}

pub fn routes() -> Routes {
    Routes::new()
        .add("/{iri}", get(show))
        .add("/{iri}/graph", get(graph))
}
