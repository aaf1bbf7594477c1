//! User HTTP handlers: register, list, profile, update, delete.

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::auth::{AdminUser, AuthUser, ExistingUser};
use crate::middleware::extract::{AppJson, AppPath};
use crate::models::{RegisterRequest, UpdateUserRequest, UserResponse};

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state.user_service().register(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users — admin only.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    Ok(Json(state.user_service().list().await?))
}

/// GET /users/profile
pub async fn profile(
    State(state): State<AppState>,
    ExistingUser(user): ExistingUser,
) -> Json<UserResponse> {
    Json(state.user_service().profile(&user))
}

/// PATCH /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service().update(&caller, id, body).await?;
    Ok(Json(user))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.user_service().delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
