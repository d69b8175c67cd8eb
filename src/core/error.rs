// Centralized error handling for the service

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Errors raised by the credential store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,

    #[error("Blocking store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors raised while talking to the embedding or completion provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request to provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned error status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider response was missing {0}")]
    MissingData(&'static str),

    #[error("Provider returned {actual} embeddings for {expected} inputs")]
    EmbeddingCount { expected: usize, actual: usize },
}

/// Errors raised while encoding or decoding bearer tokens
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token encoding failed: {0}")]
    Encode(jsonwebtoken::errors::Error),

    #[error("Token is invalid: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("Token has no subject claim")]
    MissingSubject,
}

/// Errors that prevent the FAQ corpus from loading at startup
#[derive(Error, Debug)]
pub enum FaqLoadError {
    #[error("Failed to read FAQ file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed FAQ file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Failed to embed FAQ questions: {0}")]
    Embedding(#[from] ProviderError),

    #[error("Embedding for question {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Errors surfaced to HTTP clients
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Incorrect username or password")]
    AuthenticationFailure,

    #[error("Could not validate credentials")]
    TokenInvalid(#[from] TokenError),

    #[error("Credential store failure: {0}")]
    Store(#[from] StoreError),

    #[error("Provider failure: {0}")]
    Provider(#[from] ProviderError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Signing failures are our fault, not the caller's
            AppError::TokenInvalid(TokenError::Encode(_))
            | AppError::TokenInvalid(TokenError::UnsupportedAlgorithm(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::AuthenticationFailure | AppError::TokenInvalid(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match &self {
            AppError::Store(e) => {
                error!(error = %e, "Credential store failure");
                "Internal server error".to_string()
            }
            AppError::Provider(e) => {
                error!(error = %e, "Provider failure");
                "Upstream provider error".to_string()
            }
            AppError::TokenInvalid(e) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                error!(error = %e, "Token signing failure");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(ErrorResponse { detail });

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        (status, body).into_response()
    }
}
