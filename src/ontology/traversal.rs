//! Depth-bounded descendant traversal from named category roots.
//!
//! Traversal walks `parent_class_of` edges only, breadth first, with an
//! explicit frontier and visited set so that cyclic relations terminate and
//! every class is emitted at most once.

use std::{
    collections::{BTreeMap, HashSet},
    fmt::{self, Display, Formatter},
    str::FromStr,
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{
    entities::OwlClass,
    repositories::{ClassStore, StoreError},
    value_objects::{Iri, IriError},
};

/// Depth used by semantic search when the caller does not supply one.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Depth used by plain taxonomy listings when the caller does not supply one.
pub const TAXONOMY_DEFAULT_DEPTH: usize = 1;

/// Ordered, IRI-unique classes reachable from a root set.
pub type CategoryResult = Vec<Arc<OwlClass>>;

macro_rules! categories {
    ($($variant:ident => $slug:literal;)+) => {
        /// Named subtrees of the ontology exposed for listing and semantic search.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Category {
            $($variant,)+
        }

        impl Category {
            /// Every category, in slug order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// URL-safe identifier, e.g. `area_of_law`.
            #[must_use]
            pub fn slug(self) -> &'static str {
                match self {
                    $(Self::$variant => $slug,)+
                }
            }

            /// Local name of the default root class, e.g. `AreaOfLaw`.
            #[must_use]
            pub fn root_name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }

        impl FromStr for Category {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($slug => Ok(Self::$variant),)+
                    other => Err(UnknownCategory(other.to_string())),
                }
            }
        }
    };
}

categories! {
    ActorPlayer => "actor_player";
    AreaOfLaw => "area_of_law";
    AssetType => "asset_type";
    CommunicationModality => "communication_modality";
    Currency => "currency";
    DataFormat => "data_format";
    DocumentArtifact => "document_artifact";
    EngagementTerms => "engagement_terms";
    Event => "event";
    ForumsVenues => "forums_venues";
    GovernmentalBody => "governmental_body";
    Industry => "industry";
    Language => "language";
    LegalAuthorities => "legal_authorities";
    LegalEntity => "legal_entity";
    Location => "location";
    MatterNarrative => "matter_narrative";
    MatterNarrativeFormat => "matter_narrative_format";
    Objectives => "objectives";
    Service => "service";
    StandardsCompatibility => "standards_compatibility";
    Status => "status";
    SystemIdentifiers => "system_identifiers";
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Raised when a category selector does not name a known category.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

/// Maps each [`Category`] to the IRIs at the top of its subtree.
#[derive(Clone, Debug)]
pub struct CategoryRoots {
    namespace: String,
    overrides: BTreeMap<Category, Vec<Iri>>,
}

impl CategoryRoots {
    /// Root sets derived from `namespace`: every category is rooted at
    /// `{namespace}{root_name}`.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            overrides: BTreeMap::new(),
        }
    }

    /// Builds root sets from configuration, validating every override.
    pub fn from_overrides(
        namespace: impl Into<String>,
        overrides: &BTreeMap<Category, Vec<String>>,
    ) -> Result<Self, IriError> {
        let namespace = namespace.into();
        let mut roots = Self::new(namespace.clone());
        for (category, raw) in overrides {
            let iris = raw
                .iter()
                .map(|value| Iri::resolve(value, &namespace))
                .collect::<Result<Vec<_>, _>>()?;
            roots.overrides.insert(*category, iris);
        }
        Ok(roots)
    }

    /// Root IRIs of `category`.
    ///
    /// A default root that cannot form a valid IRI with the configured
    /// namespace yields an empty set, which traverses to an empty result.
    #[must_use]
    pub fn roots(&self, category: Category) -> Vec<Iri> {
        if let Some(roots) = self.overrides.get(&category) {
            return roots.clone();
        }
        Iri::new(format!("{}{}", self.namespace, category.root_name()))
            .map(|iri| vec![iri])
            .unwrap_or_default()
    }
}

/// Collects `roots` and their descendants up to `max_depth` levels down.
///
/// Depth 0 yields the roots that exist in the store. Roots and children
/// missing from the store are skipped. Output is breadth-first discovery
/// order; within a level, children follow the relation order of the parent
/// that reached them first.
pub fn traverse<S>(store: &S, roots: &[Iri], max_depth: usize) -> Result<CategoryResult, StoreError>
where
    S: ClassStore + ?Sized,
{
    let mut visited: HashSet<Iri> = HashSet::new();
    let mut result: CategoryResult = Vec::new();
    let mut frontier: Vec<Arc<OwlClass>> = Vec::new();

    for root in roots {
        if visited.contains(root) {
            continue;
        }
        if let Some(class) = store.get(root)? {
            visited.insert(root.clone());
            result.push(Arc::clone(&class));
            frontier.push(class);
        }
    }

    for _ in 0..max_depth {
        if frontier.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for parent in &frontier {
            for child_iri in &parent.parent_class_of {
                if visited.contains(child_iri) {
                    continue;
                }
                let Some(child) = store.get(child_iri)? else {
                    continue;
                };
                visited.insert(child_iri.clone());
                result.push(Arc::clone(&child));
                next.push(child);
            }
        }
        frontier = next;
    }

    debug!(
        roots = roots.len(),
        max_depth,
        classes = result.len(),
        "taxonomy_traversed"
    );
    Ok(result)
}
