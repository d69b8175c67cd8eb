use crate::core::error::AppError;
use axum::{http::Uri, response::IntoResponse, response::Response};

pub async fn fallback_handler(uri: Uri) -> Response {
    AppError::NotFound(format!(
        "{}. Valid endpoints: /create-users, /ask-question, /health",
        uri.path()
    ))
    .into_response()
}
