use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

use super::dto::{
    LoginRequest, LoginResponse, MessageResponse, ProfileResponse, RegisterRequest,
    RegisterResponse, UpdateUserRequest,
};
use super::extractors::RawToken;
use super::store::UserPatch;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/users", get(profile).patch(update_profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let user_id = state
        .service
        .register(&payload.full_name, &payload.phone_number, &payload.password)
        .await?;

    Ok(Json(RegisterResponse {
        message: format!("Successfully created user with id : {user_id}"),
        user_id,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let outcome = state
        .service
        .login(&payload.phone_number, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        message: format!("Successfully login user with id : {}", outcome.user_id),
        token: outcome.token,
    }))
}

#[instrument(skip(state, token))]
pub async fn profile(
    State(state): State<AppState>,
    RawToken(token): RawToken,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.service.fetch_profile(&token).await?;

    Ok(Json(ProfileResponse {
        full_name: profile.full_name,
        phone_number: profile.phone_number,
    }))
}

#[instrument(skip(state, token, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    RawToken(token): RawToken,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let patch = UserPatch {
        full_name: payload.full_name,
        phone_number: payload.phone_number,
    };
    state.service.update_profile(&token, patch).await?;

    Ok(Json(MessageResponse {
        message: "Successfully update user data.".into(),
    }))
}
