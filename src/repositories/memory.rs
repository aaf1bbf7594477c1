//! Process-lifetime user store backed by an ordered `Vec`.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::UserRepository;
use crate::error::{AppError, AppResult, MSG_EMAIL_TAKEN, MSG_USER_NOT_FOUND};
use crate::models::{User, UserPatch};

/// In-memory repository. Clones share the same records.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(MSG_EMAIL_TAKEN.to_string()));
        }
        users.push(user.clone());
        debug!(user_id = %user.id, total = users.len(), "user inserted");
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> AppResult<User> {
        let mut users = self.users.write().await;
        if let Some(email) = &patch.email {
            if users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(AppError::Conflict(MSG_EMAIL_TAKEN.to_string()));
            }
        }
        let slot = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(MSG_USER_NOT_FOUND.to_string()))?;
        patch.apply(slot);
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut users = self.users.write().await;
        match users.iter().position(|u| u.id == id) {
            Some(index) => {
                users.remove(index);
                debug!(user_id = %id, total = users.len(), "user removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
