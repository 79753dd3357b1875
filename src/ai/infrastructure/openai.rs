use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ai::{Scorer, ScorerError, ScorerInitError},
    config::OpenAiSettings,
    ontology::entities::OwlClass,
    search::{Score, SearchResult},
};

const DEFAULT_SYSTEM_PROMPT: &str = "You rank legal ontology classes by relevance to a search \
query. Answer only with a JSON array of objects with the fields `iri` and `score`, where \
`score` is a number between 0 and 1. Omit classes that are not relevant.";

/// Semantic scorer backed by OpenAI chat completions.
pub struct OpenAiScorer {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    system_prompt: String,
}

#[derive(Serialize)]
struct CandidateView<'a> {
    iri: &'a str,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    definition: Option<&'a str>,
}

#[derive(Deserialize)]
struct RankedEntry {
    iri: String,
    score: f64,
}

impl OpenAiScorer {
    /// Instantiates a new scorer using the provided configuration.
    pub fn try_new(settings: &OpenAiSettings) -> Result<Self, ScorerInitError> {
        if settings.api_key.trim().is_empty() {
            return Err(ScorerInitError::InvalidConfiguration(
                "`ai.scorer.api_key` must be provided".to_string(),
            ));
        }
        if settings.model.trim().is_empty() {
            return Err(ScorerInitError::InvalidConfiguration(
                "`ai.scorer.model` must be provided".to_string(),
            ));
        }

        let mut config = OpenAIConfig::new().with_api_key(settings.api_key.clone());
        if let Some(base) = &settings.api_base {
            config = config.with_api_base(base.clone());
        }
        let client = Client::with_config(config);

        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            system_prompt: settings
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        })
    }

    fn build_messages(
        &self,
        query: &str,
        candidates: &[Arc<OwlClass>],
    ) -> Result<Vec<ChatCompletionRequestMessage>, ScorerError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(self.system_prompt.clone())
            .build()
            .map_err(|err| ScorerError::Request(err.to_string()))?;

        let user_content = format!(
            "Query: {query}\n\nCandidates:\n{}",
            candidates_as_json(candidates)?
        );
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Text(user_content))
            .build()
            .map_err(|err| ScorerError::Request(err.to_string()))?;

        Ok(vec![
            ChatCompletionRequestMessage::System(system),
            ChatCompletionRequestMessage::User(user),
        ])
    }
}

#[async_trait]
impl Scorer for OpenAiScorer {
    async fn rank(
        &self,
        query: &str,
        candidates: &[Arc<OwlClass>],
    ) -> Result<Vec<SearchResult>, ScorerError> {
        let messages = self.build_messages(query, candidates)?;
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(self.model.clone());
        builder.messages(messages);
        if let Some(max_tokens) = self.max_tokens {
            builder.max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            builder.temperature(temperature);
        }
        let payload = builder
            .build()
            .map_err(|err| ScorerError::Request(err.to_string()))?;

        let response = self
            .client
            .chat()
            .create(payload)
            .await
            .map_err(|err| ScorerError::Provider(err.to_string()))?;

        let message = response
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or(ScorerError::EmptyResponse)?;

        parse_ranking(&message, candidates)
    }
}

fn candidates_as_json(candidates: &[Arc<OwlClass>]) -> Result<String, ScorerError> {
    let views: Vec<_> = candidates
        .iter()
        .map(|class| CandidateView {
            iri: class.iri.as_str(),
            label: class.display_label(),
            definition: class.definition.as_deref(),
        })
        .collect();
    serde_json::to_string_pretty(&views).map_err(|err| ScorerError::Request(err.to_string()))
}

/// Reads the model's JSON ranking and maps it back onto `candidates`.
///
/// Entries naming IRIs outside the candidate set are dropped, as are repeats
/// of an IRI already ranked. The result is ordered by descending score.
fn parse_ranking(
    message: &str,
    candidates: &[Arc<OwlClass>],
) -> Result<Vec<SearchResult>, ScorerError> {
    let entries: Vec<RankedEntry> = serde_json::from_str(strip_code_fence(message))
        .map_err(|err| ScorerError::InvalidResponse(err.to_string()))?;

    let by_iri: HashMap<&str, &Arc<OwlClass>> = candidates
        .iter()
        .map(|class| (class.iri.as_str(), class))
        .collect();

    let mut ranked: Vec<SearchResult> = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(class) = by_iri.get(entry.iri.as_str()) else {
            debug!(iri = entry.iri.as_str(), "semantic_ranking_unknown_iri");
            continue;
        };
        if ranked.iter().any(|result| result.class.iri == class.iri) {
            continue;
        }
        ranked.push(SearchResult::new(Arc::clone(class), Score::Semantic(entry.score)));
    }
    ranked.sort_by(|a, b| {
        b.score
            .value()
            .partial_cmp(&a.score.value())
            .unwrap_or(Ordering::Equal)
    });
    Ok(ranked)
}

fn strip_code_fence(message: &str) -> &str {
    let trimmed = message.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_suffix("```").unwrap_or(body);
    // Drop an info string such as `json` on the opening fence.
    match body.split_once('\n') {
        Some((info, rest)) if !info.trim().starts_with('[') => rest.trim(),
        _ => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::value_objects::Iri;

    fn candidates() -> Vec<Arc<OwlClass>> {
        ["A", "B", "C"]
            .into_iter()
            .map(|local| {
                Arc::new(
                    OwlClass::new(Iri::new(format!("https://example.org/{local}")).unwrap())
                        .with_label(local),
                )
            })
            .collect()
    }

    #[test]
    fn ranking_is_sorted_and_filtered() {
        let message = r#"```json
[{"iri": "https://example.org/B", "score": 0.4},
 {"iri": "https://example.org/Z", "score": 0.99},
 {"iri": "https://example.org/A", "score": 0.9},
 {"iri": "https://example.org/B", "score": 0.1}]
```"#;
        let ranked = parse_ranking(message, &candidates()).expect("parse");
        let pairs: Vec<_> = ranked
            .iter()
            .map(|result| (result.class.iri.local_name(), result.score))
            .collect();
        assert_eq!(
            pairs,
            [("A", Score::Semantic(0.9)), ("B", Score::Semantic(0.4))]
        );
    }

    #[test]
    fn unreadable_ranking_is_an_error() {
        let err = parse_ranking("no idea", &candidates()).expect_err("invalid");
        assert!(matches!(err, ScorerError::InvalidResponse(_)));
    }

    #[test]
    fn bare_json_is_accepted() {
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```[1]```"), "[1]");
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let settings = OpenAiSettings {
            api_key: " ".to_string(),
            model: "gpt-4o-mini".to_string(),
            ..OpenAiSettings::default()
        };
        assert!(matches!(
            OpenAiScorer::try_new(&settings),
            Err(ScorerInitError::InvalidConfiguration(_))
        ));
    }
}
