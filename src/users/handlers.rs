use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{CreateUserRequest, CreateUserResponse},
    models::PublicUser,
};
use crate::{
    auth::jwt::AuthUser,
    config::RegistrationPolicy,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users).post(create_user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
) -> AppResult<Json<Vec<PublicUser>>> {
    let users = state.accounts.list_users().await?;
    info!(requester = %requester, count = users.len(), "users listed");
    Ok(Json(users))
}

#[instrument(skip(state, requester, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    requester: Option<AuthUser>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreateUserResponse>)> {
    if state.config.registration == RegistrationPolicy::Authenticated && requester.is_none() {
        return Err(AppError::Authentication(
            "Authentication required to register users".into(),
        ));
    }

    let Json(payload) = payload?;
    let user = state.accounts.register(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User added".into(),
            user: user.into(),
        }),
    ))
}
