use std::sync::Arc;

use tracing::debug;

use crate::{
    config::OntologySettings,
    ontology::{
        entities::OwlClass,
        graph::{NeighborGraph, NeighborGraphBuilder},
        repositories::{ClassStoreHandle, StoreError, StoreMetadata},
        store::InMemoryClassStore,
        traversal::{self, Category, CategoryResult, CategoryRoots},
        value_objects::{Iri, IriError},
    },
    search::SearchIndex,
};

/// High level ontology service wiring the class store and category roots
/// together.
#[derive(Clone)]
pub struct OntologyService {
    store: Arc<ClassStoreHandle>,
    roots: CategoryRoots,
    namespace: String,
}

impl OntologyService {
    /// Creates a new [`OntologyService`] from a store handle.
    pub fn new(store: Arc<ClassStoreHandle>, roots: CategoryRoots, namespace: impl Into<String>) -> Self {
        Self {
            store,
            roots,
            namespace: namespace.into(),
        }
    }

    /// Loads the configured snapshot and builds a service around it.
    pub async fn from_config(settings: &OntologySettings) -> Result<Self, OntologyServiceError> {
        let roots = CategoryRoots::from_overrides(settings.namespace.clone(), &settings.categories)?;
        let store = InMemoryClassStore::load(settings).await?;
        Ok(Self::new(Arc::new(store), roots, settings.namespace.clone()))
    }

    /// Describes the loaded ontology.
    pub fn metadata(&self) -> StoreMetadata {
        self.store.metadata()
    }

    /// Number of loaded classes.
    pub fn class_count(&self) -> Result<usize, StoreError> {
        self.store.len()
    }

    /// Looks a class up by full IRI or by local name under the namespace.
    ///
    /// An identifier that cannot form an IRI names no class and is reported
    /// as [`OntologyServiceError::NotFound`], like any other miss.
    pub fn lookup(&self, raw: &str) -> Result<Arc<OwlClass>, OntologyServiceError> {
        match Iri::resolve(raw, &self.namespace) {
            Ok(iri) => self.class(&iri),
            Err(_) => Err(OntologyServiceError::NotFound {
                iri: raw.to_string(),
            }),
        }
    }

    /// Looks a class up, reporting a miss as [`OntologyServiceError::NotFound`].
    pub fn class(&self, iri: &Iri) -> Result<Arc<OwlClass>, OntologyServiceError> {
        self.store
            .get(iri)?
            .ok_or_else(|| OntologyServiceError::NotFound {
                iri: iri.to_string(),
            })
    }

    /// Lists `category` and its descendants up to `max_depth` levels.
    pub fn categorize(
        &self,
        category: Category,
        max_depth: usize,
    ) -> Result<CategoryResult, StoreError> {
        let roots = self.roots.roots(category);
        debug!(category = category.slug(), max_depth, "taxonomy_categorize");
        traversal::traverse(self.store.as_ref(), &roots, max_depth)
    }

    /// Builds the neighbor graph of the class named by `raw`.
    pub fn neighbors(&self, raw: &str) -> Result<NeighborGraph, OntologyServiceError> {
        let focal = self.lookup(raw)?;
        Ok(NeighborGraphBuilder::new(self.store.as_ref()).build(&focal)?)
    }

    /// Lexical matchers over every loaded class.
    pub fn search(&self) -> SearchIndex<'_, ClassStoreHandle> {
        SearchIndex::new(self.store.as_ref())
    }
}

/// Errors raised by ontology lookups.
#[derive(Debug, thiserror::Error)]
pub enum OntologyServiceError {
    /// Referenced class was not found.
    #[error("class `{iri}` not found")]
    NotFound { iri: String },
    /// A configured category root cannot form an IRI.
    #[error(transparent)]
    InvalidIri(#[from] IriError),
    /// The class store could not answer.
    #[error(transparent)]
    Store(#[from] StoreError),
}
