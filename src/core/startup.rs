use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::api::client::OpenAiClient;
use crate::core::config::Config;
use crate::core::state::AppState;
use crate::faq::corpus::{load_records, FaqCorpus};
use crate::stores::credential_store::CredentialStore;

// Runs once at boot; any failure here keeps the service from starting
pub async fn build_state(config: Config) -> Result<AppState> {
    let credentials = CredentialStore::open(&config.database.path, config.auth.password_iterations)
        .context(format!(
            "Failed to open credential database at '{}'",
            config.database.path.display()
        ))?;

    let users = credentials
        .count()
        .await
        .context("Failed to read credential database")?;

    info!(
        path = %config.database.path.display(),
        users,
        "Credential store opened"
    );

    let client = Arc::new(
        OpenAiClient::new(&config.provider).context("Failed to create provider client")?,
    );

    let records = load_records(&config.faq.path).context(format!(
        "Failed to load FAQ file '{}'",
        config.faq.path.display()
    ))?;

    info!(
        path = %config.faq.path.display(),
        questions = records.len(),
        model = %config.provider.embedding_model,
        "Embedding FAQ questions"
    );

    let corpus = FaqCorpus::build(records, client.as_ref())
        .await
        .context("Failed to build FAQ corpus")?;

    AppState::new(config, credentials, corpus, client.clone(), client)
        .context("Failed to initialize token service")
}
