// Shared fixtures for unit tests

use crate::api::provider::{CompletionProvider, EmbeddingProvider};
use crate::core::config::{Config, ServiceAccountConfig};
use crate::core::error::ProviderError;
use crate::core::state::AppState;
use crate::faq::corpus::FaqCorpus;
use crate::models::faq::FaqRecord;
use crate::stores::credential_store::CredentialStore;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Deterministic bag-of-words embedder: each token is hashed into a bucket
/// and the vector is L2-normalized.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(8) }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];

        for token in text
            .to_ascii_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut h: u64 = 1469598103934665603;
            for b in token.as_bytes() {
                h ^= *b as u64;
                h = h.wrapping_mul(1099511628211);
            }
            v[(h as usize) % self.dim] += 1.0;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }

        v
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        Ok(self.embed(text))
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }
}

/// Completion provider that returns a canned reply and records prompts
#[derive(Debug)]
pub struct FixedCompletion {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl FixedCompletion {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FixedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Completion provider that always fails like an upstream 503
#[derive(Debug)]
pub struct FailingCompletion;

#[async_trait]
impl CompletionProvider for FailingCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.auth.secret_key = "test-secret".to_string();
    config.auth.password_iterations = 1_000;
    config.auth.service_account = ServiceAccountConfig {
        enabled: true,
        name: "task_user_1".to_string(),
        password: "task_password_1".to_string(),
    };
    config.provider.api_key = "sk-test".to_string();
    config
}

pub fn reset_password_faq() -> Vec<FaqRecord> {
    vec![FaqRecord {
        question: "How do I reset my password?".to_string(),
        answer: "Visit settings > security.".to_string(),
    }]
}

pub async fn create_test_state(
    records: Vec<FaqRecord>,
    completer: Arc<dyn CompletionProvider>,
) -> Arc<AppState> {
    let embedder = Arc::new(HashEmbedder::new(256));
    let corpus = FaqCorpus::build(records, embedder.as_ref()).await.unwrap();
    let config = create_test_config();
    let credentials = CredentialStore::open_in_memory(config.auth.password_iterations).unwrap();

    Arc::new(AppState::new(config, credentials, corpus, embedder, completer).unwrap())
}
