//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BASKET_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `BASKET_BASE_URL` - Public URL of the storefront (checkout redirects, cookie security)
//! - `MEDIA_API_URL` - Media hosting provider endpoint
//! - `MEDIA_API_KEY` - Media hosting provider API key
//! - `PAYMENT_API_URL` - Payment provider endpoint
//! - `PAYMENT_API_KEY` - Payment provider secret key
//! - `AI_API_KEY` - AI completion provider API key
//!
//! ## Optional
//! - `BASKET_HOST` - Bind address (default: 127.0.0.1)
//! - `BASKET_PORT` - Listen port (default: 3000)
//! - `AI_API_URL` - AI completion endpoint (default: OpenRouter)
//! - `AI_MODEL` - Completion model id (default: mistralai/mistral-medium-3)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Media hosting provider configuration
    pub media: MediaConfig,
    /// Payment provider configuration
    pub payment: PaymentConfig,
    /// AI completion provider configuration
    pub ai: AiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Media hosting provider configuration (image upload/destroy).
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Provider API endpoint
    pub api_url: String,
    /// Provider API key
    pub api_key: SecretString,
}

/// Payment provider configuration (checkout sessions).
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Provider API endpoint
    pub api_url: String,
    /// Provider secret key
    pub api_key: SecretString,
}

/// AI completion provider configuration (product descriptions).
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Provider API endpoint
    pub api_url: String,
    /// Provider API key
    pub api_key: SecretString,
    /// Model identifier
    pub model: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BASKET_DATABASE_URL")?;
        let host = get_env_or_default("BASKET_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BASKET_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BASKET_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BASKET_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("BASKET_BASE_URL")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            media: MediaConfig::from_env()?,
            payment: PaymentConfig::from_env()?,
            ai: AiConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public base URL is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl MediaConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: get_required_env("MEDIA_API_URL")?,
            api_key: get_required_secret("MEDIA_API_KEY")?,
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: get_required_env("PAYMENT_API_URL")?,
            api_key: get_required_secret("PAYMENT_API_KEY")?,
        })
    }
}

impl AiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: get_env_or_default("AI_API_URL", "https://openrouter.ai/api/v1"),
            api_key: get_required_secret("AI_API_KEY")?,
            model: get_env_or_default("AI_MODEL", "mistralai/mistral-medium-3"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ApiConfig {
        ApiConfig {
            database_url: SecretString::from("postgres://localhost/basket"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            media: MediaConfig {
                api_url: "https://media.example.com/v1".to_string(),
                api_key: SecretString::from("media-key"),
            },
            payment: PaymentConfig {
                api_url: "https://pay.example.com/v1".to_string(),
                api_key: SecretString::from("payment-key"),
            },
            ai: AiConfig {
                api_url: "https://openrouter.ai/api/v1".to_string(),
                api_key: SecretString::from("ai-key"),
                model: "mistralai/mistral-medium-3".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = test_config();
        assert!(!config.is_secure());
        config.base_url = "https://shop.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = test_config();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("postgres://localhost/basket"));
        assert!(!debug_output.contains("payment-key"));
    }
}
