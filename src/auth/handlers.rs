use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthData, ChangePasswordRequest, LoginRequest, PublicUser, RegisterRequest},
        extractors::AuthUser,
        services,
    },
    error::AppError,
    response::ApiSuccess,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/password", put(change_password))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<AuthData>, AppError> {
    let Json(payload) = payload?;
    let data = services::register(state.users.as_ref(), &state.jwt, payload).await?;
    Ok(ApiSuccess::created("User registered successfully.", data))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<AuthData>, AppError> {
    let Json(payload) = payload?;
    let data = services::login(state.users.as_ref(), &state.jwt, payload).await?;
    Ok(ApiSuccess::ok("Login successful.", data))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<ApiSuccess<PublicUser>, AppError> {
    let me = services::current_user(state.users.as_ref(), &user).await?;
    Ok(ApiSuccess::ok("User retrieved successfully.", me))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.user_id))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<ApiSuccess<()>, AppError> {
    let Json(payload) = payload?;
    services::change_password(state.users.as_ref(), &user, payload).await?;
    Ok(ApiSuccess::message("Password changed successfully."))
}
