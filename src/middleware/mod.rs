//! Request guards and extractors applied before handlers run.

pub mod auth;
pub mod extract;

pub use auth::{AdminUser, AuthUser, ExistingUser, Identity};
pub use extract::{AppJson, AppPath};
