//! Application configuration loaded from environment variables.
//!
//! Values come from the process environment, with a `.env` file as a
//! fallback for local development.

use std::env;
use std::time::Duration;

/// Avatar assigned to freshly created profiles.
pub const DEFAULT_AVATAR_URL: &str = "https://cdn-icons-png.flaticon.com/512/149/149071.png";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Web API key of the backend project (public)
    pub firebase_api_key: String,
    /// Backend project ID (Firestore database owner)
    pub project_id: String,
    /// Object storage bucket for profile images
    pub storage_bucket: String,
    /// Identity Toolkit endpoint (sign in / sign up)
    pub auth_base_url: String,
    /// Secure Token endpoint (ID token refresh)
    pub secure_token_url: String,
    /// Object storage REST endpoint
    pub storage_base_url: String,
    /// Resync period for subscriptions, on top of pushed change events
    pub sync_poll_interval: Duration,
    /// Avatar URL for profiles created without one
    pub default_avatar_url: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            firebase_api_key: "test_api_key".to_string(),
            project_id: "test-project".to_string(),
            storage_bucket: "test-project.firebasestorage.app".to_string(),
            auth_base_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            secure_token_url: "https://securetoken.googleapis.com/v1/token".to_string(),
            storage_base_url: "https://firebasestorage.googleapis.com/v0".to_string(),
            sync_poll_interval: Duration::from_millis(50),
            default_avatar_url: DEFAULT_AVATAR_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let project_id =
            env::var("FIREBASE_PROJECT_ID").map_err(|_| ConfigError::Missing("FIREBASE_PROJECT_ID"))?;

        let poll_ms = match env::var("SYNC_POLL_INTERVAL_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::Invalid("SYNC_POLL_INTERVAL_MS", raw))?,
            Err(_) => 2000,
        };

        Ok(Self {
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            storage_bucket: env::var("FIREBASE_STORAGE_BUCKET")
                .unwrap_or_else(|_| format!("{}.firebasestorage.app", project_id)),
            auth_base_url: env::var("FIREBASE_AUTH_URL")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com/v1".to_string()),
            secure_token_url: env::var("FIREBASE_TOKEN_URL")
                .unwrap_or_else(|_| "https://securetoken.googleapis.com/v1/token".to_string()),
            storage_base_url: env::var("FIREBASE_STORAGE_URL")
                .unwrap_or_else(|_| "https://firebasestorage.googleapis.com/v0".to_string()),
            sync_poll_interval: Duration::from_millis(poll_ms),
            default_avatar_url: env::var("DEFAULT_AVATAR_URL")
                .unwrap_or_else(|_| DEFAULT_AVATAR_URL.to_string()),
            project_id,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("FIREBASE_API_KEY", " test_key ");
        env::set_var("FIREBASE_PROJECT_ID", "contacts-test");
        env::remove_var("FIREBASE_STORAGE_BUCKET");
        env::remove_var("SYNC_POLL_INTERVAL_MS");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.firebase_api_key, "test_key");
        assert_eq!(config.project_id, "contacts-test");
        assert_eq!(config.storage_bucket, "contacts-test.firebasestorage.app");
        assert_eq!(config.sync_poll_interval, Duration::from_millis(2000));
    }
}
