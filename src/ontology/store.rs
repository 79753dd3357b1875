use std::{collections::HashMap, path::Path, sync::Arc, time::Duration};

use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::{
    config::{OntologySettings, OntologySource},
    ontology::{
        entities::OwlClass,
        repositories::{ClassStore, StoreError, StoreMetadata},
        value_objects::Iri,
    },
};

/// Serialized ontology snapshot consumed by [`InMemoryClassStore::from_snapshot`].
#[derive(Debug, Default, Deserialize)]
pub struct OntologySnapshot {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub classes: Vec<OwlClass>,
}

/// Class store holding every record in memory.
///
/// Records live in a dense arena in load order; `index` maps each IRI to its
/// arena slot. The store is immutable once built.
#[derive(Debug, Default)]
pub struct InMemoryClassStore {
    classes: Vec<Arc<OwlClass>>,
    index: HashMap<Iri, usize>,
    metadata: StoreMetadata,
}

impl InMemoryClassStore {
    /// Builds a store from class records, keeping the first record of any
    /// repeated IRI.
    pub fn new(classes: impl IntoIterator<Item = OwlClass>) -> Self {
        let mut store = Self::default();
        for mut class in classes {
            if store.index.contains_key(&class.iri) {
                warn!(iri = %class.iri, "ontology_duplicate_class_skipped");
                continue;
            }
            class.normalize_relations();
            store.index.insert(class.iri.clone(), store.classes.len());
            store.classes.push(Arc::new(class));
        }
        store
    }

    /// Attaches descriptive metadata to the store.
    #[must_use]
    pub fn with_metadata(mut self, metadata: StoreMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Builds a store from a decoded snapshot.
    pub fn from_snapshot(snapshot: OntologySnapshot, mut metadata: StoreMetadata) -> Self {
        metadata.title = snapshot.title;
        metadata.description = snapshot.description;
        Self::new(snapshot.classes).with_metadata(metadata)
    }

    /// Decodes a JSON snapshot document.
    pub fn from_json(bytes: &[u8], metadata: StoreMetadata) -> Result<Self, StoreError> {
        let snapshot: OntologySnapshot = serde_json::from_slice(bytes)?;
        Ok(Self::from_snapshot(snapshot, metadata))
    }

    /// Loads the store from the configured source.
    ///
    /// Configured title and description take precedence over the ones carried
    /// by the snapshot.
    pub async fn load(settings: &OntologySettings) -> Result<Self, StoreError> {
        let bytes = match &settings.source {
            OntologySource::File { path } => read_snapshot(path).await?,
            OntologySource::Http {
                url,
                cache_path,
                timeout_secs,
            } => {
                fetch_snapshot(url, cache_path.as_deref(), Duration::from_secs(*timeout_secs))
                    .await?
            }
        };

        let mut store = Self::from_json(&bytes, settings.source.metadata())?;
        if let Some(title) = &settings.title {
            store.metadata.title = title.clone();
        }
        if let Some(description) = &settings.description {
            store.metadata.description = description.clone();
        }
        info!(
            source = store.metadata.source_type.as_str(),
            classes = store.classes.len(),
            "ontology_loaded"
        );
        Ok(store)
    }

    /// Arena slot of `iri`, if loaded.
    #[must_use]
    pub fn position(&self, iri: &Iri) -> Option<usize> {
        self.index.get(iri).copied()
    }
}

impl ClassStore for InMemoryClassStore {
    fn get(&self, iri: &Iri) -> Result<Option<Arc<OwlClass>>, StoreError> {
        Ok(self
            .position(iri)
            .map(|slot| Arc::clone(&self.classes[slot])))
    }

    fn contains(&self, iri: &Iri) -> Result<bool, StoreError> {
        Ok(self.index.contains_key(iri))
    }

    fn all(&self) -> Result<Vec<Arc<OwlClass>>, StoreError> {
        Ok(self.classes.clone())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.classes.len())
    }

    fn metadata(&self) -> StoreMetadata {
        self.metadata.clone()
    }
}

async fn read_snapshot(path: &Path) -> Result<Vec<u8>, StoreError> {
    fs::read(path).await.map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

async fn cached_snapshot(cache_path: Option<&Path>) -> Result<Option<Vec<u8>>, StoreError> {
    let Some(cache) = cache_path else {
        return Ok(None);
    };
    match fs::metadata(cache).await {
        Ok(meta) if meta.is_file() => {
            debug!(path = %cache.display(), "ontology_cache_hit");
            read_snapshot(cache).await.map(Some)
        }
        _ => Ok(None),
    }
}

#[cfg(feature = "source_http")]
async fn fetch_snapshot(
    url: &str,
    cache_path: Option<&Path>,
    timeout: Duration,
) -> Result<Vec<u8>, StoreError> {
    if let Some(bytes) = cached_snapshot(cache_path).await? {
        return Ok(bytes);
    }

    let http_error = |err: reqwest::Error| StoreError::Http {
        url: url.to_string(),
        message: err.to_string(),
    };
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http_error)?;
    let bytes = client
        .get(url)
        .send()
        .await
        .map_err(http_error)?
        .error_for_status()
        .map_err(http_error)?
        .bytes()
        .await
        .map_err(http_error)?
        .to_vec();

    if let Some(cache) = cache_path {
        write_cache(cache, &bytes).await;
    }
    Ok(bytes)
}

#[cfg(not(feature = "source_http"))]
async fn fetch_snapshot(
    url: &str,
    cache_path: Option<&Path>,
    _timeout: Duration,
) -> Result<Vec<u8>, StoreError> {
    if let Some(bytes) = cached_snapshot(cache_path).await? {
        return Ok(bytes);
    }
    Err(StoreError::Http {
        url: url.to_string(),
        message: "built without the `source_http` feature".to_string(),
    })
}

/// A failed cache write is not fatal: the snapshot is already in memory.
#[cfg(feature = "source_http")]
async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if let Err(error) = fs::create_dir_all(dir).await {
            warn!(err.msg = %error, path = %path.display(), "ontology_cache_write_failed");
            return;
        }
    }
    if let Err(error) = fs::write(path, bytes).await {
        warn!(err.msg = %error, path = %path.display(), "ontology_cache_write_failed");
    }
}

impl OntologySource {
    fn metadata(&self) -> StoreMetadata {
        let (source_type, location) = match self {
            Self::File { path } => ("file", path_text(path)),
            Self::Http { url, .. } => ("http", url.clone()),
        };
        StoreMetadata {
            source_type: source_type.to_string(),
            location: Some(location),
            ..StoreMetadata::default()
        }
    }
}

fn path_text(path: &Path) -> String {
    path.display().to_string()
}
