//! User account REST API: registration, JWT login, profile, update and delete
//! over an in-memory user store.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;
pub use services::UserService;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use chrono::Duration;
use handlers::http;

use auth::{JwtSecret, PasswordService};
use repositories::{InMemoryUserRepository, UserRepository};

/// Wire the store, hasher and token issuer described by `config`.
pub fn build_state(config: &Config, repo: Arc<dyn UserRepository>) -> Result<AppState, AppError> {
    let passwords = PasswordService::with_costs(config.hash_memory_kib, config.hash_iterations)?;
    let jwt_secret = JwtSecret::with_ttl(
        config.secret_key.clone(),
        Duration::hours(config.token_ttl_hours),
    );
    Ok(AppState::new(UserService::new(repo, passwords, jwt_secret)))
}

/// State backed by a fresh in-memory store.
pub fn in_memory_state(config: &Config) -> Result<AppState, AppError> {
    build_state(config, Arc::new(InMemoryUserRepository::new()))
}

/// Build the API router. Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", get(http::health))
        .route("/login", post(auth::login))
        .route(
            "/users",
            post(handlers::create_user).get(handlers::list_users),
        )
        .route("/users/profile", get(handlers::profile))
        .route(
            "/users/:id",
            patch(handlers::update_user).delete(handlers::delete_user),
        )
        .with_state(state)
}
