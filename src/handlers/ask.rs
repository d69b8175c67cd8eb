use crate::core::error::AppError;
use crate::core::state::AppState;
use crate::models::api::{AnswerResponse, AskQuery};
use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;
use tracing::info;

/// Authenticate, then answer from the FAQ corpus or the completion provider
///
/// POST /ask-question?username=<name>&password=<password>&user_query=<text>
pub async fn ask_question_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AskQuery>,
) -> Result<Json<AnswerResponse>, AppError> {
    let principal = state
        .authenticator
        .authenticate(&params.username, &params.password)
        .await?;

    // Issue and immediately verify an access token for the principal
    let token = state
        .tokens
        .issue(principal.name(), state.tokens.default_ttl())?;
    let subject = state.tokens.verify(&token)?;

    let answer = state.answers.answer(&params.user_query).await?;

    info!(
        user = %subject,
        source = ?answer.source,
        similarity = %answer.similarity_coef,
        "Question answered"
    );

    Ok(Json(answer))
}
