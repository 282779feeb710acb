//! Administrator management commands.
//!
//! # Usage
//!
//! ```bash
//! manara-cli admin create -e editor@manara.media -n "News Desk"
//! ```
//!
//! Creating a row here does not grant login access by itself; the email
//! must also be on the server's `MANARA_ADMIN_EMAILS` allow-list.

use secrecy::ExposeSecret;
use sqlx::PgPool;

use manara_core::Email;
use manara_server::db::AdminRepository;

use super::{CommandError, database_url};

/// Seed an administrator row with an optional display name.
///
/// # Errors
///
/// Returns `CommandError` if the email is malformed, the database is
/// unreachable, or a row with that email already exists.
pub async fn create(email: &str, name: Option<&str>) -> Result<i32, CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidEmail(e.to_string()))?;

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Creating administrator: {}", email);

    let admin = AdminRepository::new(&pool)
        .create(email.as_str(), name)
        .await?;

    tracing::info!(
        "Administrator created successfully! ID: {}, Email: {}",
        admin.id,
        admin.email
    );

    Ok(admin.id.as_i32())
}
