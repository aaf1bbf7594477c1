//! Auth HTTP handlers: login.

use axum::{extract::State, Json};

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::extract::AppJson;
use crate::models::{LoginRequest, LoginResponse};

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = state.user_service().login(body).await?;
    Ok(Json(LoginResponse { token }))
}
