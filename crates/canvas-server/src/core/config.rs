//! Canvas server configuration

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::canvas::CanvasRepository;
use crate::core::auth::token::TokenService;
use crate::core::auth::CredentialStore;

/// Configuration for the Canvas Server.
///
/// Built once at startup and shared read-only through [`AppState`].
#[derive(Clone)]
pub struct ServerConfig {
    /// Directory holding the SQLite database
    pub data_dir: PathBuf,
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,
    /// Lifetime of an issued token
    pub token_ttl: Duration,
    /// Upper bound on any single store call
    pub store_timeout: Duration,
    /// Listen port
    pub port: u16,
    /// bcrypt cost factor for new password hashes
    pub hash_cost: u32,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("data_dir", &self.data_dir)
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("store_timeout", &self.store_timeout)
            .field("port", &self.port)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

impl ServerConfig {
    pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
    pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;
    pub const DEFAULT_PORT: u16 = 3000;
    pub const DEFAULT_HASH_COST: u32 = 10;

    /// Create config with custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>, jwt_secret: impl Into<String>) -> Self {
        Self {
            data_dir: base_dir.into(),
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::from_secs(Self::DEFAULT_TOKEN_TTL_SECS),
            store_timeout: Duration::from_millis(Self::DEFAULT_STORE_TIMEOUT_MS),
            port: Self::DEFAULT_PORT,
            hash_cost: Self::DEFAULT_HASH_COST,
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = std::env::var("CANVAS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("canvas_data"));

        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let mut config = Self::with_base_dir(data_dir, jwt_secret);
        config.token_ttl = Duration::from_secs(env_number(
            "JWT_EXPIRE_SECS",
            Self::DEFAULT_TOKEN_TTL_SECS,
        )?);
        config.store_timeout = Duration::from_millis(env_number(
            "STORE_TIMEOUT_MS",
            Self::DEFAULT_STORE_TIMEOUT_MS,
        )?);
        config.port = env_number("PORT", Self::DEFAULT_PORT)?;

        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("canvas.sqlite")
    }

    /// Ensure the data directory exists
    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }
}

fn env_number<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<TokenService>,
    pub canvases: Arc<CanvasRepository>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_dir_defaults() {
        let config = ServerConfig::with_base_dir("/tmp/canvas", "secret");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/canvas/canvas.sqlite"));
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.store_timeout, Duration::from_millis(5000));
        assert_eq!(config.port, 3000);
        assert_eq!(config.hash_cost, 10);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ServerConfig::with_base_dir("data", "super-secret-value");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret-value"));
    }

    #[tokio::test]
    async fn test_ensure_dirs_creates_data_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::with_base_dir(temp_dir.path().join("nested"), "secret");
        config.ensure_dirs().await.unwrap();
        assert!(config.data_dir.is_dir());
    }
}
