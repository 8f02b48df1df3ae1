//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_TOKEN_SECRET` - Session token signing secret (min 32 chars)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STORE_OP_TIMEOUT_MS` - Per-operation store deadline (default: 2000)
//! - `SMTP_HOST` - SMTP relay; enables email when set, together with:
//!   - `SMTP_USER`, `SMTP_PASSWORD`, `EMAIL_FROM`, `OWNER_EMAIL`

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Session token signing secret.
    pub token_secret: SecretString,
    /// Per-operation deadline for the document store.
    pub store_op_timeout: Duration,
    /// SMTP configuration; `None` disables outbound email.
    pub email: Option<EmailConfig>,
}

/// SMTP configuration for the notification dispatcher.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP username.
    pub smtp_user: String,
    /// SMTP password.
    pub smtp_password: SecretString,
    /// From address for outbound mail.
    pub from_address: String,
    /// Store owner address for new-order notifications.
    pub owner_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("owner_address", &self.owner_address)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the token secret is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_owned(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_owned(), e.to_string())
            })?;

        let token_secret = get_required_env("STOREFRONT_TOKEN_SECRET")?;
        if token_secret.len() < MIN_TOKEN_SECRET_LENGTH {
            return Err(ConfigError::InsecureSecret(
                "STOREFRONT_TOKEN_SECRET".to_owned(),
                format!("must be at least {MIN_TOKEN_SECRET_LENGTH} characters"),
            ));
        }

        let store_op_timeout_ms = get_env_or_default("STORE_OP_TIMEOUT_MS", "2000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STORE_OP_TIMEOUT_MS".to_owned(), e.to_string())
            })?;

        let email = match std::env::var("SMTP_HOST") {
            Ok(smtp_host) => Some(EmailConfig {
                smtp_host,
                smtp_user: get_required_env("SMTP_USER")?,
                smtp_password: SecretString::from(get_required_env("SMTP_PASSWORD")?),
                from_address: get_required_env("EMAIL_FROM")?,
                owner_address: get_required_env("OWNER_EMAIL")?,
            }),
            Err(_) => None,
        };

        Ok(Self {
            host,
            port,
            token_secret: SecretString::from(token_secret),
            store_op_timeout: Duration::from_millis(store_op_timeout_ms),
            email,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}
