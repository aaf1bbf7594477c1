//! Application error types mapped onto HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const MSG_MISSING_AUTH: &str = "Missing authorization headers";
pub const MSG_INVALID_TOKEN: &str = "Invalid token";
pub const MSG_WRONG_CREDENTIALS: &str = "Wrong email/password";
pub const MSG_NOT_ADMIN: &str = "missing admin permissions";
pub const MSG_EMAIL_TAKEN: &str = "Email already registered";
pub const MSG_IS_ADM_IMMUTABLE: &str = "Can't update isAdm";
pub const MSG_USER_NOT_FOUND: &str = "User not found";

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Body or path could not be extracted; keeps the extractor's status.
    #[error("Rejected request ({0}): {1}")]
    Rejected(StatusCode, String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthenticated(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected(status, _) => *status,
        }
    }

    /// Message sent to the client.
    pub fn message(&self) -> String {
        match self {
            AppError::Config(_) | AppError::Internal(_) => "Internal server error".to_string(),
            AppError::Jwt(_) => MSG_INVALID_TOKEN.to_string(),
            AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::Rejected(_, msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Config(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
            }
            AppError::Jwt(detail) => tracing::debug!(%detail, "token rejected"),
            _ => {}
        }

        let body = Json(json!({ "message": self.message() }));
        (self.status(), body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status() {
        assert_eq!(
            AppError::Unauthenticated(MSG_MISSING_AUTH.into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Jwt("expired".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden(MSG_NOT_ADMIN.into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound(MSG_USER_NOT_FOUND.into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict(MSG_EMAIL_TAKEN.into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::BadRequest(MSG_IS_ADM_IMMUTABLE.into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Rejected(StatusCode::UNPROCESSABLE_ENTITY, "missing field".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn hides_internal_details() {
        assert_eq!(AppError::Jwt("ExpiredSignature".into()).message(), MSG_INVALID_TOKEN);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("hash: bad salt")).message(),
            "Internal server error"
        );
    }
}
