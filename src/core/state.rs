// Application state (AppState)

use crate::api::provider::{CompletionProvider, EmbeddingProvider};
use crate::core::config::Config;
use crate::core::error::TokenError;
use crate::faq::corpus::FaqCorpus;
use crate::faq::router::AnswerRouter;
use crate::security::authenticator::Authenticator;
use crate::security::token::TokenService;
use crate::stores::credential_store::CredentialStore;
use std::sync::Arc;

/// Shared application state
///
/// Everything here is either immutable after startup or internally
/// synchronized, so handlers share it through a single `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// User table
    pub credentials: Arc<CredentialStore>,

    /// Store lookup plus optional service account
    pub authenticator: Arc<Authenticator>,

    pub tokens: Arc<TokenService>,

    /// Embedded FAQ entries, read-only
    pub corpus: Arc<FaqCorpus>,

    pub answers: Arc<AnswerRouter>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        credentials: CredentialStore,
        corpus: FaqCorpus,
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Arc<dyn CompletionProvider>,
    ) -> Result<Self, TokenError> {
        let config = Arc::new(config);
        let credentials = Arc::new(credentials);
        let corpus = Arc::new(corpus);

        let tokens = Arc::new(TokenService::from_config(&config.auth)?);

        let authenticator = Arc::new(Authenticator::new(
            Arc::clone(&credentials),
            &config.auth.service_account,
        ));

        let answers = Arc::new(AnswerRouter::new(
            Arc::clone(&corpus),
            embedder,
            completer,
            config.faq.threshold,
        ));

        Ok(Self {
            credentials,
            authenticator,
            tokens,
            corpus,
            answers,
            config,
        })
    }
}
