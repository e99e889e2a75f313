//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup; a `.env` file is honored for local
//! development.

use std::env;
use std::path::PathBuf;

/// Default number of hikes shown in a user's feed.
pub const DEFAULT_FEED_LIMIT: u32 = 20;

/// Default PBKDF2 rounds for password hashes.
pub const DEFAULT_PASSWORD_ITERATIONS: u32 = 600_000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Directory where uploaded hike photos are stored
    pub image_dir: PathBuf,
    /// Frontend URL (CORS origin, cookie security)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Maximum number of hikes in a feed
    pub feed_limit: u32,
    /// PBKDF2 rounds used for new password hashes
    pub password_iterations: u32,
    /// Session token signing key (raw bytes)
    pub session_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "hikes.db".to_string())
                .into(),
            image_dir: env::var("IMAGE_DIR")
                .unwrap_or_else(|_| "images".to_string())
                .into(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            feed_limit: env::var("FEED_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FEED_LIMIT),
            password_iterations: env::var("PASSWORD_ITERATIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_PASSWORD_ITERATIONS),
            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        let tmp = env::temp_dir();
        Self {
            database_path: tmp.join("hikelog-test.db"),
            image_dir: tmp.join("hikelog-test-images"),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            feed_limit: DEFAULT_FEED_LIMIT,
            password_iterations: 1_000,
            session_signing_key: b"test_session_key_32_bytes_min!!!".to_vec(),
        }
    }

    /// Whether session cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        !(self.frontend_url.starts_with("http://localhost")
            || self.frontend_url.starts_with("http://127.0.0.1"))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
