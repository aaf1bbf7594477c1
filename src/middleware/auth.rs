//! Auth guard chain as extractors: bearer token, then record existence, then admin flag.
//!
//! Each stage runs the one before it, so listing `AdminUser` in a handler
//! signature runs all three checks in order and stops at the first failure.

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use uuid::Uuid;

use crate::error::{AppError, AppResult, MSG_MISSING_AUTH, MSG_NOT_ADMIN, MSG_WRONG_CREDENTIALS};
use crate::handlers::http::AppState;
use crate::models::User;
use crate::repositories::UserRepository;

const BEARER_PREFIX: &str = "Bearer ";

/// Caller identity decoded from a verified token.
///
/// Only `id` drives decisions. `age` and `is_adm` are the claims as they were
/// when the token was issued and are informational; privilege checks read the
/// stored record instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Identity {
    pub id: Uuid,
    pub age: Option<u32>,
    pub is_adm: bool,
}

/// Extractor: authenticated caller from `Authorization: Bearer <token>`.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub Identity);

/// Extractor: authenticated caller whose record is still in the store.
#[derive(Clone, Debug)]
pub struct ExistingUser(pub User);

/// Extractor: authenticated, existing caller with the admin flag set.
#[derive(Clone, Debug)]
pub struct AdminUser(pub User);

/// Absent header is `Unauthenticated`; a header that is not a usable bearer
/// value is treated like a bad token.
fn bearer_token(parts: &Parts) -> AppResult<&str> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated(MSG_MISSING_AUTH.to_string()))?;
    header
        .to_str()
        .ok()
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Jwt("malformed authorization header".to_string()))
}

pub async fn ensure_exists(repo: &dyn UserRepository, identity: &Identity) -> AppResult<User> {
    repo.find_by_id(identity.id)
        .await?
        .ok_or_else(|| AppError::NotFound(MSG_WRONG_CREDENTIALS.to_string()))
}

pub fn ensure_admin(user: User) -> AppResult<User> {
    if !user.is_adm {
        return Err(AppError::Forbidden(MSG_NOT_ADMIN.to_string()));
    }
    Ok(user)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.user_service().jwt_secret().validate(token)?;
        Ok(AuthUser(Identity {
            id: claims.subject()?,
            age: claims.age,
            is_adm: claims.is_adm,
        }))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for ExistingUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        let user = ensure_exists(state.user_service().repo(), &identity).await?;
        Ok(ExistingUser(user))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ExistingUser(user) = ExistingUser::from_request_parts(parts, state).await?;
        Ok(AdminUser(ensure_admin(user)?))
    }
}
