use crate::core::error::AppError;
use crate::core::state::AppState;
use crate::models::api::CreateUserQuery;
use crate::models::user::User;
use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;
use tracing::info;

/// Create a user
///
/// POST /create-users?name=<name>&password=<password>
pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CreateUserQuery>,
) -> Result<Json<User>, AppError> {
    let user = state.credentials.create(&params.name, &params.password).await?;

    info!(user_id = user.id, name = %user.name, "User created");

    Ok(Json(user))
}
