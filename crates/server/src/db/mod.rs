//! Database access for the content API.
//!
//! # Tables
//!
//! - `admin` - Administrator identities (allow-listed emails)
//! - `news_article` - Magazine news articles
//! - `project` - Real-estate project listings
//!
//! All queries use the sqlx runtime query API with `FromRow` models; no
//! statement spans more than one round-trip and no multi-statement
//! transactions exist in this service.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are run explicitly via:
//! ```bash
//! cargo run -p manara-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod admins;
pub mod news;
pub mod projects;

pub use admins::{AdminDirectory, AdminRepository, PgAdminDirectory};
pub use news::NewsRepository;
pub use projects::ProjectRepository;

/// Errors returned by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The referenced row does not exist.
    #[error("row not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
