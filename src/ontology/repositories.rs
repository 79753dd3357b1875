use std::{path::PathBuf, sync::Arc};

use serde::Serialize;
use thiserror::Error;

use super::entities::OwlClass;
use super::value_objects::Iri;

/// Descriptive information about the loaded ontology and where it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoreMetadata {
    /// Title of the ontology.
    pub title: String,
    /// Free text description of the ontology.
    pub description: String,
    /// Kind of source the snapshot was loaded from (`file`, `http`, `memory`).
    pub source_type: String,
    /// Path or URL of the snapshot, when applicable.
    pub location: Option<String>,
}

impl Default for StoreMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            source_type: "memory".to_string(),
            location: None,
        }
    }
}

/// Read-only view over the ontology classes.
///
/// Implementations are shared across concurrent requests and must not
/// require callers to synchronise. Lookups of unknown IRIs answer `Ok(None)`
/// or `Ok(false)`; an `Err` means the store itself could not answer.
pub trait ClassStore: Send + Sync {
    /// Returns the class identified by `iri`, if present.
    fn get(&self, iri: &Iri) -> Result<Option<Arc<OwlClass>>, StoreError>;

    /// Membership test.
    fn contains(&self, iri: &Iri) -> Result<bool, StoreError> {
        Ok(self.get(iri)?.is_some())
    }

    /// Every class, in an order that stays stable for the lifetime of the
    /// process.
    fn all(&self) -> Result<Vec<Arc<OwlClass>>, StoreError>;

    /// Number of classes held by the store.
    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.all()?.len())
    }

    /// Returns `true` when the store holds no classes.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Describes the loaded ontology.
    fn metadata(&self) -> StoreMetadata;
}

/// Type alias simplifying store trait object usage.
pub type ClassStoreHandle = dyn ClassStore + 'static;

/// Errors raised when the class store cannot answer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading a snapshot from disk failed.
    #[error("failed to access ontology snapshot `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Fetching a remote snapshot failed.
    #[error("failed to fetch ontology snapshot from `{url}`: {message}")]
    Http { url: String, message: String },
    /// The snapshot content could not be decoded.
    #[error("failed to decode ontology snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}
