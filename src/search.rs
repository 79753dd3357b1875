//! Lexical matchers over the full class set.
//!
//! Label and definition relevance uses a fixed tiered score:
//!
//! | match against the text                       | score |
//! | -------------------------------------------- | ----- |
//! | equal, ignoring case                         | 100   |
//! | text starts with the query                   | 80    |
//! | text contains the query                      | 60    |
//! | every query token appears as a text token    | 40    |
//! | `m` of `n` query tokens appear               | `max(1, 20 * m / n)` |
//!
//! Alternative labels score 10 below the same match on a primary label
//! (never below 1). A class scores the best of its labels; zero excludes it.
//! Results are sorted by descending score, ties keeping store order.

use std::{cmp::Reverse, collections::HashSet, sync::Arc};

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::ontology::{
    entities::OwlClass,
    repositories::{ClassStore, StoreError},
};

/// Shortest accepted free-text query, in characters.
pub const MIN_QUERY_CHARS: usize = 2;
/// Longest accepted free-text query, in characters.
pub const MAX_QUERY_CHARS: usize = 1024;

const EXACT: u32 = 100;
const STARTS_WITH: u32 = 80;
const CONTAINS: u32 = 60;
const ALL_TOKENS: u32 = 40;
const PARTIAL_TOKENS: u32 = 20;
const ALTERNATIVE_PENALTY: u32 = 10;

/// Returns `true` when `query` is within the accepted length bounds.
///
/// Every free-text entry point rejects out-of-bounds queries with an empty
/// result instead of an error.
#[must_use]
pub fn accepts_query(query: &str) -> bool {
    (MIN_QUERY_CHARS..=MAX_QUERY_CHARS).contains(&query.chars().count())
}

/// Relevance attached to a search hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Score {
    /// Tiered lexical match score.
    Lexical(u32),
    /// Similarity reported by a semantic scorer.
    Semantic(f64),
}

impl Score {
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Lexical(score) => f64::from(score),
            Self::Semantic(score) => score,
        }
    }
}

/// A class paired with its relevance score.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub class: Arc<OwlClass>,
    pub score: Score,
}

impl SearchResult {
    #[must_use]
    pub fn new(class: Arc<OwlClass>, score: Score) -> Self {
        Self { class, score }
    }
}

/// Serialized as a `[class, score]` pair.
impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.class.as_ref(), &self.score).serialize(serializer)
    }
}

/// Prefix, label and definition matchers over a [`ClassStore`].
pub struct SearchIndex<'a, S>
where
    S: ClassStore + ?Sized,
{
    store: &'a S,
}

impl<'a, S> SearchIndex<'a, S>
where
    S: ClassStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Classes whose display label starts with `query`, ignoring case, in
    /// store order.
    pub fn by_prefix(&self, query: &str) -> Result<Vec<Arc<OwlClass>>, StoreError> {
        if !accepts_query(query) {
            return Ok(Vec::new());
        }
        let prefix = query.to_lowercase();
        let matches: Vec<_> = self
            .store
            .all()?
            .into_iter()
            .filter(|class| class.display_label().to_lowercase().starts_with(&prefix))
            .collect();
        debug!(matches = matches.len(), "search_prefix");
        Ok(matches)
    }

    /// Ranks classes by how well their labels match `query`.
    pub fn by_label(&self, query: &str) -> Result<Vec<SearchResult>, StoreError> {
        self.rank(query, "search_label", |class, query| {
            class
                .labels()
                .map(|(label, primary)| {
                    let score = text_score(label, query);
                    if primary || score == 0 {
                        score
                    } else {
                        score.saturating_sub(ALTERNATIVE_PENALTY).max(1)
                    }
                })
                .max()
                .unwrap_or(0)
        })
    }

    /// Ranks classes by how well their definition matches `query`.
    pub fn by_definition(&self, query: &str) -> Result<Vec<SearchResult>, StoreError> {
        self.rank(query, "search_definition", |class, query| {
            class
                .definition
                .as_deref()
                .map_or(0, |definition| text_score(definition, query))
        })
    }

    fn rank(
        &self,
        query: &str,
        event: &'static str,
        score: impl Fn(&OwlClass, &NormalizedQuery) -> u32,
    ) -> Result<Vec<SearchResult>, StoreError> {
        if !accepts_query(query) {
            return Ok(Vec::new());
        }
        let query = NormalizedQuery::new(query);
        let mut scored: Vec<(u32, Arc<OwlClass>)> = self
            .store
            .all()?
            .into_iter()
            .filter_map(|class| {
                let value = score(class.as_ref(), &query);
                (value > 0).then_some((value, class))
            })
            .collect();
        scored.sort_by_key(|(value, _)| Reverse(*value));
        debug!(matches = scored.len(), event, "search_ranked");
        Ok(scored
            .into_iter()
            .map(|(value, class)| SearchResult::new(class, Score::Lexical(value)))
            .collect())
    }
}

struct NormalizedQuery {
    text: String,
    tokens: Vec<String>,
}

impl NormalizedQuery {
    fn new(raw: &str) -> Self {
        let text = raw.to_lowercase();
        let tokens = {
            let mut seen = HashSet::new();
            tokenize(&text)
                .filter(|token| seen.insert(*token))
                .map(str::to_string)
                .collect()
        };
        Self { text, tokens }
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
}

fn text_score(text: &str, query: &NormalizedQuery) -> u32 {
    let text = text.to_lowercase();
    if query.text.trim().is_empty() {
        return 0;
    }
    if text == query.text {
        return EXACT;
    }
    if text.starts_with(&query.text) {
        return STARTS_WITH;
    }
    if text.contains(&query.text) {
        return CONTAINS;
    }
    if query.tokens.is_empty() {
        return 0;
    }
    let words: HashSet<&str> = tokenize(&text).collect();
    let found = query
        .tokens
        .iter()
        .filter(|token| words.contains(token.as_str()))
        .count();
    let total = query.tokens.len();
    if found == total {
        ALL_TOKENS
    } else if found > 0 {
        let partial = PARTIAL_TOKENS as usize * found / total;
        u32::try_from(partial).unwrap_or(PARTIAL_TOKENS).max(1)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::ontology::{store::InMemoryClassStore, value_objects::Iri};

    fn iri(local: &str) -> Iri {
        Iri::new(format!("https://example.org/{local}")).expect("valid iri")
    }

    #[rstest]
    #[case("a", false)]
    #[case("", false)]
    #[case("ab", true)]
    #[case("é€", true)]
    fn query_bounds(#[case] query: &str, #[case] accepted: bool) {
        assert_eq!(accepts_query(query), accepted);
    }

    #[test]
    fn query_bounds_upper_limit_counts_characters() {
        assert!(accepts_query(&"x".repeat(MAX_QUERY_CHARS)));
        assert!(!accepts_query(&"x".repeat(MAX_QUERY_CHARS + 1)));
        assert!(accepts_query(&"é".repeat(MAX_QUERY_CHARS)));
    }

    #[rstest]
    #[case("Contract Law", "contract law", EXACT)]
    #[case("Contract Law", "contract", STARTS_WITH)]
    #[case("Law of Contracts", "contracts", CONTAINS)]
    #[case("Law of Contracts", "contracts law", ALL_TOKENS)]
    #[case("Law of Contracts", "contracts tax", 10)]
    #[case("Law of Contracts", "tax", 0)]
    fn tiered_text_scores(#[case] text: &str, #[case] query: &str, #[case] expected: u32) {
        assert_eq!(text_score(text, &NormalizedQuery::new(query)), expected);
    }

    #[test]
    fn alternative_labels_rank_below_primary() {
        let store = InMemoryClassStore::new([
            OwlClass::new(iri("Alt")).with_label("Other").with_alternative_label("Tax"),
            OwlClass::new(iri("Primary")).with_label("Tax"),
        ]);
        let results = SearchIndex::new(&store).by_label("tax").expect("search");
        let ranked: Vec<_> = results
            .iter()
            .map(|result| (result.class.iri.local_name(), result.score))
            .collect();
        assert_eq!(
            ranked,
            [("Primary", Score::Lexical(100)), ("Alt", Score::Lexical(90))]
        );
    }

    #[test]
    fn result_serializes_as_pair() {
        let class = Arc::new(OwlClass::new(iri("A")).with_label("A"));
        let value = serde_json::to_value(SearchResult::new(class, Score::Lexical(60)))
            .expect("serialize");
        assert_eq!(value[0]["label"], "A");
        assert_eq!(value[1], 60);
    }
}
