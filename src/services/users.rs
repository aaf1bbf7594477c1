//! User account business rules: register, login, list, profile, update, delete.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{JwtSecret, PasswordService};
use crate::error::{
    AppError, AppResult, MSG_EMAIL_TAKEN, MSG_IS_ADM_IMMUTABLE, MSG_NOT_ADMIN, MSG_USER_NOT_FOUND,
    MSG_WRONG_CREDENTIALS,
};
use crate::middleware::auth::Identity;
use crate::models::{
    LoginRequest, RegisterRequest, UpdateUserRequest, User, UserPatch, UserResponse,
};
use crate::repositories::UserRepository;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    passwords: PasswordService,
    jwt_secret: JwtSecret,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        passwords: PasswordService,
        jwt_secret: JwtSecret,
    ) -> Self {
        Self {
            repo,
            passwords,
            jwt_secret,
        }
    }

    pub fn repo(&self) -> &dyn UserRepository {
        self.repo.as_ref()
    }

    pub fn jwt_secret(&self) -> &JwtSecret {
        &self.jwt_secret
    }

    pub async fn register(&self, req: RegisterRequest) -> AppResult<UserResponse> {
        if self.repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict(MSG_EMAIL_TAKEN.to_string()));
        }

        let password_hash = self.passwords.hash_password(&req.password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: req.email,
            name: req.name,
            password_hash,
            age: req.age,
            is_adm: req.is_adm,
            created_on: now,
            updated_on: now,
        };

        // Insert re-checks the email under the write lock.
        let user = self.repo.insert(user).await?;
        info!(user_id = %user.id, is_adm = user.is_adm, "user registered");
        Ok(UserResponse::from(user))
    }

    /// Returns a signed token. Unknown email and wrong password fail identically.
    pub async fn login(&self, req: LoginRequest) -> AppResult<String> {
        let wrong_credentials = || AppError::Unauthenticated(MSG_WRONG_CREDENTIALS.to_string());

        let Some(user) = self.repo.find_by_email(&req.email).await? else {
            self.passwords.verify_against_dummy(&req.password).await?;
            debug!("login rejected: unknown email");
            return Err(wrong_credentials());
        };

        if !self
            .passwords
            .verify_password(&req.password, &user.password_hash)
            .await?
        {
            debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(wrong_credentials());
        }

        let token = self.jwt_secret.issue(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    pub async fn list(&self) -> AppResult<Vec<UserResponse>> {
        let users = self.repo.list().await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    pub fn profile(&self, user: &User) -> UserResponse {
        UserResponse::from(user)
    }

    pub async fn update(
        &self,
        caller: &Identity,
        target_id: Uuid,
        req: UpdateUserRequest,
    ) -> AppResult<UserResponse> {
        if req.touches_is_adm() {
            return Err(AppError::BadRequest(MSG_IS_ADM_IMMUTABLE.to_string()));
        }

        self.authorize(caller, target_id).await?;

        if self.repo.find_by_id(target_id).await?.is_none() {
            return Err(AppError::NotFound(MSG_USER_NOT_FOUND.to_string()));
        }

        // Hash before taking the store lock; the merge itself runs on the
        // current record so concurrent patches to other fields survive.
        let password_hash = match req.password {
            Some(password) => Some(self.passwords.hash_password(&password).await?),
            None => None,
        };
        let patch = UserPatch {
            email: req.email,
            password_hash,
            age: req.age,
            name: req.name,
        };

        let user = self.repo.update(target_id, patch).await?;
        info!(user_id = %user.id, caller_id = %caller.id, "user updated");
        Ok(UserResponse::from(user))
    }

    /// Self-deletion is always allowed; anything else needs an admin caller.
    /// An absent target is `NotFound` on both paths.
    pub async fn delete(&self, caller: &Identity, target_id: Uuid) -> AppResult<()> {
        self.authorize(caller, target_id).await?;

        if !self.repo.delete(target_id).await? {
            return Err(AppError::NotFound(MSG_USER_NOT_FOUND.to_string()));
        }
        info!(user_id = %target_id, caller_id = %caller.id, "user deleted");
        Ok(())
    }

    /// Caller acts on itself, or its stored record is admin. Token claims are not trusted
    /// for privilege since they may predate a change to the record.
    async fn authorize(&self, caller: &Identity, target_id: Uuid) -> AppResult<()> {
        if caller.id == target_id {
            return Ok(());
        }
        let is_admin = self
            .repo
            .find_by_id(caller.id)
            .await?
            .is_some_and(|u| u.is_adm);
        if !is_admin {
            debug!(caller_id = %caller.id, target_id = %target_id, "forbidden: not admin");
            return Err(AppError::Forbidden(MSG_NOT_ADMIN.to_string()));
        }
        Ok(())
    }
}
