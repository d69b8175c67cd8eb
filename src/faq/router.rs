use crate::api::provider::{CompletionProvider, EmbeddingProvider};
use crate::core::error::ProviderError;
use crate::faq::corpus::FaqCorpus;
use crate::faq::matcher::find_best_match;
use crate::models::api::{AnswerResponse, AnswerSource, NO_MATCHED_QUESTION};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Answers a question from the FAQ corpus, falling back to the completion
/// provider when nothing in the corpus is similar enough
pub struct AnswerRouter {
    corpus: Arc<FaqCorpus>,
    embedder: Arc<dyn EmbeddingProvider>,
    completer: Arc<dyn CompletionProvider>,
    threshold: f32,
}

impl AnswerRouter {
    pub fn new(
        corpus: Arc<FaqCorpus>,
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Arc<dyn CompletionProvider>,
        threshold: f32,
    ) -> Self {
        Self {
            corpus,
            embedder,
            completer,
            threshold,
        }
    }

    pub async fn answer(&self, query: &str) -> Result<AnswerResponse, ProviderError> {
        let query_embedding = self.embedder.embed_query(query).await?;

        if !self.corpus.is_empty() && query_embedding.len() != self.corpus.dimension() {
            warn!(
                query_dimension = query_embedding.len(),
                corpus_dimension = self.corpus.dimension(),
                "Query embedding dimension differs from corpus"
            );
        }

        let outcome = find_best_match(&query_embedding, self.corpus.entries(), self.threshold);
        let similarity_coef = format!("{:.2}", outcome.score);

        if let Some(entry) = outcome.entry {
            info!(
                similarity = outcome.score,
                matched_question = %entry.question,
                "Answered from FAQ corpus"
            );

            return Ok(AnswerResponse {
                source: AnswerSource::Local,
                original_question: query.to_string(),
                matched_question: entry.question.clone(),
                similarity_coef,
                response: entry.answer.clone(),
            });
        }

        debug!(
            similarity = outcome.score,
            threshold = self.threshold,
            "No FAQ entry above threshold, delegating to completion provider"
        );

        let completion = self.completer.complete(query).await?;

        info!(similarity = outcome.score, "Answered by completion provider");

        Ok(AnswerResponse {
            source: AnswerSource::External,
            original_question: query.to_string(),
            matched_question: NO_MATCHED_QUESTION.to_string(),
            similarity_coef,
            response: completion,
        })
    }
}
