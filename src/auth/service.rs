//! Password hashing and verification (argon2), run off the async executor.

use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct PasswordService {
    params: Params,
    /// Hash of a throwaway password at the configured costs. Verified against when
    /// there is no stored hash, so that path costs the same as a real check.
    dummy_hash: Arc<str>,
}

impl PasswordService {
    /// Build with explicit argon2 costs; `None` keeps the library default for that cost.
    pub fn with_costs(memory_kib: Option<u32>, iterations: Option<u32>) -> AppResult<Self> {
        let params = Params::new(
            memory_kib.unwrap_or(Params::DEFAULT_M_COST),
            iterations.unwrap_or(Params::DEFAULT_T_COST),
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| AppError::Config(format!("argon2 params: {}", e)))?;
        let mut service = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        let dummy = service.hash_password_blocking(&uuid::Uuid::new_v4().to_string())?;
        service.dummy_hash = Arc::from(dummy);
        Ok(service)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash_password_blocking(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
            .to_string();
        Ok(hash)
    }

    /// Verification reads the costs from the stored PHC string, not from `self`.
    pub fn verify_password_blocking(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let this = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || this.hash_password_blocking(&password))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task: {}", e)))?
    }

    pub async fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let this = self.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || this.verify_password_blocking(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task: {}", e)))?
    }

    /// Run a full verification that always fails. Used when there is no account to check.
    pub async fn verify_against_dummy(&self, password: &str) -> AppResult<()> {
        let dummy = self.dummy_hash.to_string();
        self.verify_password(password, &dummy).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordService {
        PasswordService::with_costs(Some(1024), Some(1)).unwrap()
    }

    #[test]
    fn hash_and_verify_password() {
        let service = fast();
        let hash = service.hash_password_blocking("mypassword").unwrap();
        assert!(service.verify_password_blocking("mypassword", &hash).unwrap());
        assert!(!service.verify_password_blocking("wrong", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let service = fast();
        let a = service.hash_password_blocking("same").unwrap();
        let b = service.hash_password_blocking("same").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("same"));
    }

    #[test]
    fn rejects_invalid_costs() {
        assert!(matches!(
            PasswordService::with_costs(Some(1), None),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn malformed_hash_is_internal_error() {
        assert!(matches!(
            fast().verify_password_blocking("pw", "not-a-phc-string"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn dummy_hash_uses_configured_costs() {
        let service = fast();
        let parsed = PasswordHash::new(&service.dummy_hash).unwrap();
        let params = Params::try_from(&parsed).unwrap();
        assert_eq!(params.m_cost(), 1024);
        assert_eq!(params.t_cost(), 1);
        assert!(!service.verify_password_blocking("", &service.dummy_hash).unwrap());
    }

    #[tokio::test]
    async fn async_wrappers_round_trip() {
        let service = fast();
        let hash = service.hash_password("pw").await.unwrap();
        assert!(service.verify_password("pw", &hash).await.unwrap());
        service.verify_against_dummy("pw").await.unwrap();
    }
}
