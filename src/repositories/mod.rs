//! User store: repository trait and its in-memory backend.

mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{User, UserPatch};

pub use memory::InMemoryUserRepository;

/// Storage capabilities the services rely on.
///
/// Implementations must enforce email uniqueness atomically in `insert` and
/// `update`, returning `AppError::Conflict` on a clash.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// All records in insertion order.
    async fn list(&self) -> AppResult<Vec<User>>;

    async fn insert(&self, user: User) -> AppResult<User>;

    /// Merge `patch` into the current record for `id` and return the result.
    /// The read, uniqueness check and write must not interleave with other
    /// mutations. `NotFound` if absent.
    async fn update(&self, id: Uuid, patch: UserPatch) -> AppResult<User>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
