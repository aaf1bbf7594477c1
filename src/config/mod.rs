//! Application configuration loaded from environment.
//!
//! `LOG_LEVEL` is read by `main` directly, before this is loaded, so that
//! warnings raised while loading are logged.

use std::net::SocketAddr;

const DEV_SECRET_KEY: &str = "user_accounts_dev_secret_change_in_production";
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. `0.0.0.0:3001`).
    pub server_addr: SocketAddr,
    /// Token signing secret (`SECRET_KEY`).
    pub secret_key: String,
    /// Lifetime of issued tokens, in hours.
    pub token_ttl_hours: i64,
    /// Argon2 memory cost in KiB. `None` keeps the library default.
    pub hash_memory_kib: Option<u32>,
    /// Argon2 iteration count. `None` keeps the library default.
    pub hash_iterations: Option<u32>,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3001".to_string());
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let secret_key = match lookup("SECRET_KEY") {
            Some(key) if key.is_empty() => return Err(ConfigLoadError::EmptySecretKey),
            Some(key) => key,
            None => {
                tracing::warn!("SECRET_KEY not set, using development secret");
                DEV_SECRET_KEY.to_string()
            }
        };

        let token_ttl_hours = match lookup("TOKEN_TTL_HOURS") {
            Some(v) => v
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0 && *h <= MAX_TOKEN_TTL_HOURS)
                .ok_or(ConfigLoadError::InvalidNumber("TOKEN_TTL_HOURS"))?,
            None => 24,
        };

        let hash_memory_kib = parse_optional(&lookup, "HASH_MEMORY_KIB")?;
        let hash_iterations = parse_optional(&lookup, "HASH_ITERATIONS")?;

        Ok(Self {
            server_addr,
            secret_key,
            token_ttl_hours,
            hash_memory_kib,
            hash_iterations,
        })
    }
}

fn parse_optional<F>(lookup: &F, key: &'static str) -> Result<Option<u32>, ConfigLoadError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.parse::<u32>().map_err(|_| ConfigLoadError::InvalidNumber(key)))
        .transpose()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,
    #[error("SECRET_KEY must not be empty")]
    EmptySecretKey,
    #[error("Invalid number in {0}")]
    InvalidNumber(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigLoadError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server_addr.port(), 3001);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.secret_key, DEV_SECRET_KEY);
        assert!(config.hash_memory_kib.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("SERVER_ADDR", "127.0.0.1:8080"),
            ("SECRET_KEY", "s3cret"),
            ("TOKEN_TTL_HOURS", "2"),
            ("HASH_MEMORY_KIB", "1024"),
            ("HASH_ITERATIONS", "1"),
        ])
        .unwrap();
        assert_eq!(config.server_addr.port(), 8080);
        assert_eq!(config.secret_key, "s3cret");
        assert_eq!(config.token_ttl_hours, 2);
        assert_eq!(config.hash_memory_kib, Some(1024));
        assert_eq!(config.hash_iterations, Some(1));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[("SERVER_ADDR", "nope")]),
            Err(ConfigLoadError::InvalidServerAddr)
        ));
        assert!(matches!(
            load(&[("SECRET_KEY", "")]),
            Err(ConfigLoadError::EmptySecretKey)
        ));
        assert!(matches!(
            load(&[("TOKEN_TTL_HOURS", "0")]),
            Err(ConfigLoadError::InvalidNumber("TOKEN_TTL_HOURS"))
        ));
        assert!(matches!(
            load(&[("HASH_ITERATIONS", "many")]),
            Err(ConfigLoadError::InvalidNumber("HASH_ITERATIONS"))
        ));
    }
}
