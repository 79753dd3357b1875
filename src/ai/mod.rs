use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    config::{AiSettings, ScorerBackend},
    ontology::{
        entities::OwlClass,
        repositories::StoreError,
        service::OntologyService,
        traversal::{Category, CategoryResult},
    },
    search::{accepts_query, SearchResult},
};

pub mod infrastructure;

/// Contract implemented by providers capable of ranking ontology classes
/// against a free-text query.
///
/// Implementations return a ranked, scored subset (or full ordering) of
/// `candidates` and must not alter the records they were given.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Scores `candidates` for `query`, most relevant first.
    async fn rank(
        &self,
        query: &str,
        candidates: &[Arc<OwlClass>],
    ) -> Result<Vec<SearchResult>, ScorerError>;
}

/// Factory error raised when building scorer adapters from configuration.
#[derive(Debug, Error)]
pub enum ScorerInitError {
    /// Provided configuration was invalid.
    #[error("invalid semantic scorer configuration: {0}")]
    InvalidConfiguration(String),
}

/// Errors surfaced by scorer adapters.
#[derive(Debug, Error)]
pub enum ScorerError {
    /// Building the provider request failed.
    #[error("failed to compose provider request: {0}")]
    Request(String),
    /// Provider returned no content.
    #[error("provider returned an empty response")]
    EmptyResponse,
    /// Provider content could not be read as a ranking.
    #[error("provider returned an unreadable ranking: {0}")]
    InvalidResponse(String),
    /// Provider interaction failed.
    #[error("provider error: {0}")]
    Provider(String),
    /// Provider did not answer in time.
    #[error("scorer did not answer within {0:?}")]
    Timeout(Duration),
}

/// Runs semantic search: builds the candidate set of a category and hands it
/// to the [`Scorer`] once.
#[derive(Clone)]
pub struct SemanticSearchOrchestrator {
    ontology: OntologyService,
    scorer: Arc<dyn Scorer>,
    timeout: Option<Duration>,
}

impl SemanticSearchOrchestrator {
    /// Creates a new orchestrator from its dependencies.
    pub fn new(ontology: OntologyService, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            ontology,
            scorer,
            timeout: None,
        }
    }

    /// Abandons scorer calls that run longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ranks the classes of `category`, down to `max_depth` levels, against
    /// `query`.
    ///
    /// Out-of-bounds queries yield an empty result without traversing or
    /// calling the scorer.
    pub async fn search(
        &self,
        category: Category,
        query: &str,
        max_depth: usize,
    ) -> Result<Vec<SearchResult>, SemanticSearchError> {
        if !accepts_query(query) {
            return Ok(Vec::new());
        }
        let candidates = self.ontology.categorize(category, max_depth)?;
        info!(
            category = category.slug(),
            max_depth,
            candidates = candidates.len(),
            "semantic_search"
        );
        self.rank_candidates(query, &candidates).await
    }

    /// Ranks an already built candidate set against `query`.
    ///
    /// The scorer output is returned as is.
    pub async fn rank_candidates(
        &self,
        query: &str,
        candidates: &CategoryResult,
    ) -> Result<Vec<SearchResult>, SemanticSearchError> {
        if !accepts_query(query) {
            return Ok(Vec::new());
        }
        let ranking = self.scorer.rank(query, candidates);
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, ranking)
                .await
                .unwrap_or(Err(ScorerError::Timeout(limit))),
            None => ranking.await,
        };
        outcome.map_err(|err| {
            error!(err.msg = %err, err.detail = ?err, "semantic_scorer_failed");
            SemanticSearchError::ScorerUnavailable(err)
        })
    }
}

/// Errors produced while orchestrating semantic search.
#[derive(Debug, Error)]
pub enum SemanticSearchError {
    /// Candidate set could not be built.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Scorer failed or timed out.
    #[error("semantic scorer unavailable: {0}")]
    ScorerUnavailable(#[source] ScorerError),
}

/// Builds a scorer adapter from configuration.
pub fn build_scorer(
    settings: &AiSettings,
) -> Result<Option<Arc<dyn Scorer>>, ScorerInitError> {
    let Some(backend) = settings.scorer.as_ref() else {
        return Ok(None);
    };

    match backend {
        ScorerBackend::OpenAi(cfg) => {
            let adapter = infrastructure::openai::OpenAiScorer::try_new(cfg)?;
            Ok(Some(Arc::new(adapter)))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::{
        ontology::{
            store::InMemoryClassStore,
            traversal::CategoryRoots,
            value_objects::Iri,
        },
        search::Score,
    };
    use std::sync::Mutex;

    /// Scorer assigning fixed scores by candidate position.
    #[derive(Default)]
    pub struct FixedScorer {
        pub calls: Mutex<Vec<String>>,
        pub scores: Vec<f64>,
    }

    #[async_trait]
    impl Scorer for FixedScorer {
        async fn rank(
            &self,
            query: &str,
            candidates: &[Arc<OwlClass>],
        ) -> Result<Vec<SearchResult>, ScorerError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{query}:{}", candidates.len()));
            Ok(candidates
                .iter()
                .zip(&self.scores)
                .map(|(class, score)| SearchResult::new(Arc::clone(class), Score::Semantic(*score)))
                .collect())
        }
    }

    /// Scorer that always fails.
    pub struct FailingScorer;

    #[async_trait]
    impl Scorer for FailingScorer {
        async fn rank(
            &self,
            _query: &str,
            _candidates: &[Arc<OwlClass>],
        ) -> Result<Vec<SearchResult>, ScorerError> {
            Err(ScorerError::Provider("offline".to_string()))
        }
    }

    /// Scorer that never answers.
    pub struct StalledScorer;

    #[async_trait]
    impl Scorer for StalledScorer {
        async fn rank(
            &self,
            _query: &str,
            _candidates: &[Arc<OwlClass>],
        ) -> Result<Vec<SearchResult>, ScorerError> {
            std::future::pending().await
        }
    }

    const NS: &str = "https://example.org/";

    fn ontology() -> OntologyService {
        let mut root = OwlClass::new(Iri::new(format!("{NS}AreaOfLaw")).unwrap())
            .with_label("Area of Law");
        root.add_child(Iri::new(format!("{NS}Contracts")).unwrap());
        let store = InMemoryClassStore::new([
            root,
            OwlClass::new(Iri::new(format!("{NS}Contracts")).unwrap()).with_label("Contracts"),
        ]);
        OntologyService::new(Arc::new(store), CategoryRoots::new(NS), NS)
    }

    #[tokio::test]
    async fn orchestrator_scores_category_candidates_once() {
        let scorer = Arc::new(FixedScorer {
            scores: vec![0.2, 0.8],
            ..FixedScorer::default()
        });
        let orchestrator = SemanticSearchOrchestrator::new(ontology(), scorer.clone());

        let results = orchestrator
            .search(Category::AreaOfLaw, "contract drafting", 3)
            .await
            .expect("orchestrator to succeed");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, Score::Semantic(0.2));
        let calls = scorer.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), ["contract drafting:2"]);
    }

    #[tokio::test]
    async fn empty_candidate_set_still_calls_scorer() {
        let scorer = Arc::new(FixedScorer::default());
        let orchestrator = SemanticSearchOrchestrator::new(ontology(), scorer.clone());

        let results = orchestrator
            .search(Category::Currency, "dollars", 3)
            .await
            .expect("orchestrator to succeed");

        assert!(results.is_empty());
        assert_eq!(scorer.calls.lock().unwrap().as_slice(), ["dollars:0"]);
    }

    #[tokio::test]
    async fn invalid_query_skips_scorer() {
        let scorer = Arc::new(FixedScorer::default());
        let orchestrator = SemanticSearchOrchestrator::new(ontology(), scorer.clone());

        let results = orchestrator
            .search(Category::AreaOfLaw, "x", 3)
            .await
            .expect("orchestrator to succeed");

        assert!(results.is_empty());
        assert!(scorer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn scorer_failure_is_reported() {
        let orchestrator = SemanticSearchOrchestrator::new(ontology(), Arc::new(FailingScorer));
        let err = orchestrator
            .search(Category::AreaOfLaw, "contracts", 1)
            .await
            .expect_err("scorer failure");
        assert!(matches!(
            err,
            SemanticSearchError::ScorerUnavailable(ScorerError::Provider(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_scorer_times_out() {
        let orchestrator = SemanticSearchOrchestrator::new(ontology(), Arc::new(StalledScorer))
            .with_timeout(Duration::from_secs(5));
        let err = orchestrator
            .search(Category::AreaOfLaw, "contracts", 1)
            .await
            .expect_err("timeout");
        assert!(matches!(
            err,
            SemanticSearchError::ScorerUnavailable(ScorerError::Timeout(_))
        ));
    }

    #[test]
    fn missing_backend_builds_no_scorer() {
        let scorer = build_scorer(&AiSettings::default()).expect("build");
        assert!(scorer.is_none());
    }
}
