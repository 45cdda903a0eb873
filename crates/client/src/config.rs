//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - none; the client falls back to a local development service
//!
//! ## Optional
//! - `BUYLOG_API_URL` - Base URL of the BuyLog service (default: `http://localhost:8080`)
//! - `BUYLOG_API_TOKEN` - Bearer token for authenticated requests

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// BuyLog client configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the BuyLog service.
    pub api_url: Url,
    /// Bearer token for authenticated requests. Absent until login
    /// has completed (the login flow itself lives outside this crate).
    pub api_token: Option<SecretString>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BUYLOG_API_URL` is set but not a
    /// valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw_url = get_env_or_default("BUYLOG_API_URL", DEFAULT_API_URL);
        let api_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BUYLOG_API_URL".to_string(), e.to_string()))?;
        let api_token = get_optional_env("BUYLOG_API_TOKEN").map(SecretString::from);

        Ok(Self { api_url, api_token })
    }

    /// Build a configuration for a known service URL (tests, embedded use).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_url` is not a valid URL.
    pub fn for_url(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("api_url".to_string(), e.to_string()))?;
        Ok(Self {
            api_url,
            api_token: None,
        })
    }

    /// Replace the bearer token (after a successful login).
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.api_token = Some(token);
        self
    }

    /// Expose the token for request construction.
    #[must_use]
    pub fn token_value(&self) -> Option<&str> {
        self.api_token.as_ref().map(ExposeSecret::expose_secret)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_url_rejects_garbage() {
        let result = ClientConfig::for_url("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::for_url("http://localhost:8080")
            .expect("valid url")
            .with_token(SecretString::from("super_secret_token"));

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));
    }

    #[test]
    fn test_token_value_roundtrip() {
        let config = ClientConfig::for_url("http://localhost:8080")
            .expect("valid url")
            .with_token(SecretString::from("abc123"));
        assert_eq!(config.token_value(), Some("abc123"));
    }
}
