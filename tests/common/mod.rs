#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use soli_graph::{
    ai::{Scorer, ScorerError},
    ontology::{
        CategoryRoots, InMemoryClassStore, Iri, OntologyService, OwlClass,
    },
    search::{Score, SearchResult},
};

pub const NS: &str = "https://soli.example.org/";

pub fn iri(local: &str) -> Iri {
    Iri::new(format!("{NS}{local}")).expect("valid iri")
}

pub fn class(local: &str) -> OwlClass {
    OwlClass::new(iri(local)).with_label(local)
}

pub fn class_with_children(local: &str, children: &[&str]) -> OwlClass {
    let mut class = class(local);
    for child in children {
        class.add_child(iri(child));
    }
    class
}

pub fn locals<'a>(classes: impl IntoIterator<Item = &'a Arc<OwlClass>>) -> Vec<String> {
    classes
        .into_iter()
        .map(|class| class.iri.local_name().to_string())
        .collect()
}

/// `AreaOfLaw` with two children, one of which has a child of its own.
pub fn area_of_law_store() -> InMemoryClassStore {
    InMemoryClassStore::new([
        class_with_children("AreaOfLaw", &["ContractLaw", "TaxLaw"]),
        class_with_children("ContractLaw", &["ContractDrafting"])
            .with_definition("Law of agreements between parties"),
        class("TaxLaw").with_definition("Law of taxation"),
        class("ContractDrafting").with_definition("Preparing contract documents"),
    ])
}

pub fn service(store: InMemoryClassStore) -> OntologyService {
    OntologyService::new(Arc::new(store), CategoryRoots::new(NS), NS)
}

/// Scorer returning the supplied scores in candidate order.
#[derive(Default)]
pub struct StubScorer {
    pub scores: Vec<f64>,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl StubScorer {
    pub fn new(scores: Vec<f64>) -> Self {
        Self {
            scores,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Scorer for StubScorer {
    async fn rank(
        &self,
        query: &str,
        candidates: &[Arc<OwlClass>],
    ) -> Result<Vec<SearchResult>, ScorerError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), locals(candidates)));
        Ok(candidates
            .iter()
            .zip(&self.scores)
            .map(|(class, score)| SearchResult::new(Arc::clone(class), Score::Semantic(*score)))
            .collect())
    }
}

/// Scorer that always fails.
pub struct OfflineScorer;

#[async_trait]
impl Scorer for OfflineScorer {
    async fn rank(
        &self,
        _query: &str,
        _candidates: &[Arc<OwlClass>],
    ) -> Result<Vec<SearchResult>, ScorerError> {
        Err(ScorerError::Provider("connection refused".to_string()))
    }
}
