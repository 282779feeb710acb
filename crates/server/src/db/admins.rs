//! Admin repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;

use manara_core::AdminId;

use super::RepositoryError;
use crate::models::Admin;

const ADMIN_COLUMNS: &str = "id, email, name, created_at, updated_at";

/// Administrator lookup as seen by the access gate.
///
/// Expressed as a trait (like the media store) so tests can substitute a
/// directory and exercise the gate's row re-check without a database.
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// Resolve an administrator id to its row, if it still exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the lookup fails.
    async fn find_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError>;
}

/// Pool-backed [`AdminDirectory`].
pub struct PgAdminDirectory {
    pool: PgPool,
}

impl PgAdminDirectory {
    /// Create a directory over the shared connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminDirectory for PgAdminDirectory {
    async fn find_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        AdminRepository::new(&self.pool).find_by_id(id).await
    }
}

/// Repository for administrator rows.
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an administrator by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(admin)
    }

    /// Get an administrator by (normalized) email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(admin)
    }

    /// Get the administrator row for an email, creating it (with no name)
    /// if it does not exist yet.
    ///
    /// A single upsert keeps repeated logins idempotent: at most one row per
    /// email, even under concurrent first logins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_or_create(&self, email: &str) -> Result<Admin, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admin (email) VALUES ($1)
             ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(admin)
    }

    /// Create an administrator with an explicit display name (CLI seeding).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, including on
    /// a duplicate email.
    pub async fn create(&self, email: &str, name: Option<&str>) -> Result<Admin, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admin (email, name) VALUES ($1, $2) RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(email)
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        Ok(admin)
    }
}
