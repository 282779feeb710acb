//! News article repository.

use sqlx::PgPool;

use manara_core::{AdminId, NewsArticleId};

use super::RepositoryError;
use crate::models::{NewNewsArticle, NewsArticle, NewsListItem};

const NEWS_COLUMNS: &str = "id, title, summary, content, category, image, author, read_time, \
                            published, published_at, created_at, updated_at, created_by";

/// Repository for news articles.
pub struct NewsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NewsRepository<'a> {
    /// Create a new news repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all published articles, newest first, each joined with the
    /// creator's email and name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(&self) -> Result<Vec<NewsListItem>, RepositoryError> {
        let items = sqlx::query_as::<_, NewsListItem>(
            "SELECT n.id, n.title, n.summary, n.content, n.category, n.image, n.author,
                    n.read_time, n.published, n.published_at, n.created_at, n.updated_at,
                    n.created_by,
                    a.email AS creator_email, a.name AS creator_name
             FROM news_article n
             JOIN admin a ON a.id = n.created_by
             WHERE n.published = TRUE
             ORDER BY n.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Get a single article by id.
    ///
    /// When `published_only` is false the published flag is ignored, which
    /// matches the historical single-article read behavior (see the
    /// `MANARA_EXPOSE_UNPUBLISHED_BY_ID` configuration).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: NewsArticleId,
        published_only: bool,
    ) -> Result<Option<NewsArticle>, RepositoryError> {
        let filter = if published_only {
            " AND published = TRUE"
        } else {
            ""
        };

        let article = sqlx::query_as::<_, NewsArticle>(&format!(
            "SELECT {NEWS_COLUMNS} FROM news_article WHERE id = $1{filter}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(article)
    }

    /// Number of articles currently in the table.
    ///
    /// Used for the round-robin placeholder image assignment at creation
    /// time; deliberately a live count, so deletions shift later
    /// assignments (observable, documented behavior).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM news_article")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Insert a new article. Always created published, with the publication
    /// timestamp set to now.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        fields: &NewNewsArticle,
        image: &str,
        author: &str,
        read_time: &str,
        creator: AdminId,
    ) -> Result<NewsArticle, RepositoryError> {
        let article = sqlx::query_as::<_, NewsArticle>(&format!(
            "INSERT INTO news_article
                 (title, summary, content, category, image, author, read_time,
                  published, published_at, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, now(), $8)
             RETURNING {NEWS_COLUMNS}"
        ))
        .bind(&fields.title)
        .bind(&fields.summary)
        .bind(&fields.content)
        .bind(&fields.category)
        .bind(image)
        .bind(author)
        .bind(read_time)
        .bind(creator)
        .fetch_one(self.pool)
        .await?;

        Ok(article)
    }

    /// Update the mutable fields of an article and bump `updated_at`.
    ///
    /// `published` and `published_at` cannot be changed here. Returns `None`
    /// if the article does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: NewsArticleId,
        fields: &NewNewsArticle,
        read_time: &str,
    ) -> Result<Option<NewsArticle>, RepositoryError> {
        let article = sqlx::query_as::<_, NewsArticle>(&format!(
            "UPDATE news_article
             SET title = $1, summary = $2, content = $3, category = $4,
                 read_time = $5, updated_at = now()
             WHERE id = $6
             RETURNING {NEWS_COLUMNS}"
        ))
        .bind(&fields.title)
        .bind(&fields.summary)
        .bind(&fields.content)
        .bind(&fields.category)
        .bind(read_time)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(article)
    }

    /// Delete an article.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: NewsArticleId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM news_article WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
