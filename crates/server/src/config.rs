//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MANARA_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `MANARA_JWT_SECRET` - Token signing secret (min 32 chars, not a placeholder)
//! - `MANARA_ADMIN_EMAILS` - Comma-separated allow-list of admin emails
//! - `CLOUDINARY_CLOUD_NAME` - Cloudinary cloud name
//! - `CLOUDINARY_API_KEY` - Cloudinary API key
//! - `CLOUDINARY_API_SECRET` - Cloudinary API secret
//!
//! ## Optional
//! - `MANARA_HOST` - Bind address (default: 127.0.0.1)
//! - `MANARA_PORT` - Listen port (default: 4000)
//! - `MANARA_BASE_URL` - Public URL of the API (default: http://localhost:4000)
//! - `MANARA_FRONTEND_ORIGIN` - Origin allowed for CORS
//! - `MANARA_EXPOSE_UNPUBLISHED_BY_ID` - Allow single-item reads of
//!   unpublished rows (default: true, matching historical behavior)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Manara server configuration.
///
/// Loaded once at startup and passed around immutably; handlers never read
/// the environment directly.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the API
    pub base_url: String,
    /// Frontend origin allowed for CORS (permissive when unset)
    pub frontend_origin: Option<String>,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Lowercased emails allowed to authenticate as administrators
    pub admin_emails: Vec<String>,
    /// Cloudinary image store configuration
    pub cloudinary: CloudinaryConfig,
    /// Whether single-item reads may return unpublished rows.
    ///
    /// Defaults to `true` for compatibility with the original behavior;
    /// `false` is the recommended stricter setting.
    pub expose_unpublished_by_id: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Cloudinary credentials.
///
/// Implements `Debug` manually to redact the API secret.
#[derive(Clone)]
pub struct CloudinaryConfig {
    /// Cloud name (appears in upload URLs)
    pub cloud_name: String,
    /// API key (sent with every signed request)
    pub api_key: String,
    /// API secret used for request signing
    pub api_secret: SecretString,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the signing secret fails validation. A missing signing secret
    /// or database URL is a fatal startup condition.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("MANARA_DATABASE_URL")?;
        let host = get_env_or_default("MANARA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MANARA_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("MANARA_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("MANARA_PORT".to_owned(), e.to_string()))?;
        let base_url = get_env_or_default("MANARA_BASE_URL", "http://localhost:4000");
        let frontend_origin = get_optional_env("MANARA_FRONTEND_ORIGIN");

        let jwt_secret = get_validated_secret("MANARA_JWT_SECRET")?;

        let admin_emails = parse_admin_emails(&get_required_env("MANARA_ADMIN_EMAILS")?);
        if admin_emails.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "MANARA_ADMIN_EMAILS".to_owned(),
                "allow-list must contain at least one email".to_owned(),
            ));
        }

        let cloudinary = CloudinaryConfig::from_env()?;

        let expose_unpublished_by_id =
            get_env_or_default("MANARA_EXPOSE_UNPUBLISHED_BY_ID", "true")
                .parse::<bool>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "MANARA_EXPOSE_UNPUBLISHED_BY_ID".to_owned(),
                        e.to_string(),
                    )
                })?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            frontend_origin,
            jwt_secret,
            admin_emails,
            cloudinary,
            expose_unpublished_by_id,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Check whether an email (already normalized to lowercase) is on the
    /// admin allow-list.
    #[must_use]
    pub fn is_allow_listed(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|e| e == email)
    }
}

impl CloudinaryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cloud_name: get_required_env("CLOUDINARY_CLOUD_NAME")?,
            api_key: get_required_env("CLOUDINARY_API_KEY")?,
            api_secret: get_required_secret("CLOUDINARY_API_SECRET")?,
        })
    }
}

/// Split a comma-separated allow-list into trimmed, lowercased, non-empty
/// entries.
#[must_use]
pub fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect()
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
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
    Err(ConfigError::MissingEnvVar(primary_key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Validate that a secret is long enough and not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "must be at least {MIN_SECRET_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_owned(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
