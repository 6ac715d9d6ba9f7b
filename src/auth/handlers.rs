use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RefreshRequest},
        jwt::{AuthUser, JwtKeys, TokenKind, TokenPair},
    },
    error::{AppError, AppResult},
    state::AppState,
    users::models::{PublicUser, UserSummary},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(get_me))
}

/// Wraps a fresh token pair and the user summary into the login/refresh response.
fn respond_with_tokens(keys: &JwtKeys, user: UserSummary) -> AppResult<AuthResponse> {
    let TokenPair { access, refresh } = keys.issue_pair(user.id).map_err(AppError::Internal)?;
    Ok(AuthResponse {
        access_token: access,
        refresh_token: refresh,
        user,
    })
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let user = state
        .accounts
        .authenticate(&payload.email, &payload.password)
        .await?;

    let keys = JwtKeys::from_ref(&state);
    let response = respond_with_tokens(&keys, PublicUser::from(user).into())?;

    info!(user_id = %response.user.id, "user logged in");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.decode(&payload.refresh_token, TokenKind::Refresh).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Authentication("Invalid or expired refresh token".into())
    })?;

    let user = state.accounts.find_user(claims.sub).await?;
    Ok(Json(respond_with_tokens(&keys, user.into())?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    Ok(Json(state.accounts.find_user(user_id).await?))
}
