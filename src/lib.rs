//! Taxonomy traversal, lexical search and semantic ranking over the SOLI
//! legal ontology, served over HTTP or from the command line.
//!
//! * [`ontology`]: class records, the read-only class store, category
//!   traversal and neighbor graphs
//! * [`search`]: prefix, label and definition matchers
//! * [`ai`]: the semantic scorer capability and its orchestrator
//! * [`controller`]: axum routes over [`app::AppContext`]

pub use self::errors::Error;

pub mod ai;
pub mod app;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod environment;
pub mod errors;
pub mod logger;
pub mod ontology;
pub mod search;

/// Application results options list
pub type Result<T, E = Error> = std::result::Result<T, E>;
