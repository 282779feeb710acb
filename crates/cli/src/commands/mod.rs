//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid email address.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository error from the server crate.
    #[error("Database error: {0}")]
    Repository(#[from] manara_server::db::RepositoryError),
}

/// Resolve the database URL, preferring `MANARA_DATABASE_URL` over the
/// generic `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("MANARA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("MANARA_DATABASE_URL"))
}
