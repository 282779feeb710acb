//! Project listing repository.

use sqlx::PgPool;

use manara_core::{AdminId, ProjectId};

use super::RepositoryError;
use crate::models::{NewProject, Project, ProjectListItem};

const PROJECT_COLUMNS: &str = "id, title, location, price, kind, description, image, \
                               published, published_at, created_at, updated_at, created_by";

/// Repository for real-estate project listings.
pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all published projects, newest first, each joined with the
    /// creator's email and name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(&self) -> Result<Vec<ProjectListItem>, RepositoryError> {
        let items = sqlx::query_as::<_, ProjectListItem>(
            "SELECT p.id, p.title, p.location, p.price, p.kind, p.description, p.image,
                    p.published, p.published_at, p.created_at, p.updated_at, p.created_by,
                    a.email AS creator_email, a.name AS creator_name
             FROM project p
             JOIN admin a ON a.id = p.created_by
             WHERE p.published = TRUE
             ORDER BY p.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Get a single project by id, optionally restricted to published rows
    /// (see `MANARA_EXPOSE_UNPUBLISHED_BY_ID`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: ProjectId,
        published_only: bool,
    ) -> Result<Option<Project>, RepositoryError> {
        let filter = if published_only {
            " AND published = TRUE"
        } else {
            ""
        };

        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM project WHERE id = $1{filter}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(project)
    }

    /// Insert a new project. Always created published, with the publication
    /// timestamp set to now.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        fields: &NewProject,
        image: Option<&str>,
        creator: AdminId,
    ) -> Result<Project, RepositoryError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO project
                 (title, location, price, kind, description, image,
                  published, published_at, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, TRUE, now(), $7)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(&fields.title)
        .bind(&fields.location)
        .bind(&fields.price)
        .bind(fields.kind)
        .bind(&fields.description)
        .bind(image)
        .bind(creator)
        .fetch_one(self.pool)
        .await?;

        Ok(project)
    }

    /// Update the mutable fields of a project and bump `updated_at`.
    ///
    /// When `image` is `Some` the stored reference is replaced; `None`
    /// leaves it untouched. `published` and `published_at` cannot be changed
    /// here. Returns `None` if the project does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProjectId,
        fields: &NewProject,
        image: Option<&str>,
    ) -> Result<Option<Project>, RepositoryError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "UPDATE project
             SET title = $1, location = $2, price = $3, kind = $4, description = $5,
                 image = COALESCE($6, image), updated_at = now()
             WHERE id = $7
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(&fields.title)
        .bind(&fields.location)
        .bind(&fields.price)
        .bind(fields.kind)
        .bind(&fields.description)
        .bind(image)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(project)
    }

    /// Delete a project.
    ///
    /// The associated remote image is the caller's responsibility: its
    /// removal is best-effort and must never block the row deletion.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM project WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
