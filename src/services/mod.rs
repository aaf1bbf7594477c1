//! Business logic for user accounts.

pub mod users;

pub use users::UserService;
