use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateUserQuery {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AskQuery {
    pub username: String,
    pub password: String,
    pub user_query: String,
}

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// Stored FAQ answer
    Local,
    /// Completion provider
    External,
}

pub const NO_MATCHED_QUESTION: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub source: AnswerSource,
    pub original_question: String,
    pub matched_question: String,
    /// Best similarity, two decimal places
    pub similarity_coef: String,
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub faq_entries: usize,
}
