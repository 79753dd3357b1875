//! Ontology domain: class records, the read-only class store, category
//! traversal and the neighbor graph projection.
//!
//! Everything here is synchronous and operates on in-memory data; the only
//! suspending call is the initial snapshot load in [`store`].

pub mod entities;
pub mod graph;
pub mod repositories;
pub mod service;
pub mod store;
pub mod traversal;
pub mod value_objects;

pub use entities::OwlClass;
pub use graph::{GraphEdge, GraphNode, NeighborGraph, NeighborGraphBuilder, Relationship};
pub use repositories::{ClassStore, ClassStoreHandle, StoreError, StoreMetadata};
pub use service::{OntologyService, OntologyServiceError};
pub use store::{InMemoryClassStore, OntologySnapshot};
pub use traversal::{
    traverse, Category, CategoryResult, CategoryRoots, UnknownCategory, DEFAULT_MAX_DEPTH,
    TAXONOMY_DEFAULT_DEPTH,
};
pub use value_objects::{Iri, IriError};
