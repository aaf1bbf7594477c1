//! Authentication: login, JWT, password hashing.

mod handlers;
mod jwt;
mod service;

pub use handlers::login;
pub use jwt::{Claims, JwtSecret};
pub use service::PasswordService;
