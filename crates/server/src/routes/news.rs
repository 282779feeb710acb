//! News article route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use manara_core::NewsArticleId;

use crate::db::NewsRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewNewsArticle, NewsArticle, news::estimate_read_time};
use crate::services::placeholders;
use crate::state::AppState;

/// Create/update request body. All four fields are mandatory; they are
/// optional here so that a missing field produces our 400 instead of a
/// deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct NewsPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// `GET /api/news`
///
/// Published articles, newest first, each with the creator's email and name.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let items = NewsRepository::new(state.pool()).list_published().await?;
    Ok(Json(json!({ "news": items })))
}

/// `GET /api/news/{id}`
///
/// Single article. Whether unpublished rows are reachable here is governed
/// by `MANARA_EXPOSE_UNPUBLISHED_BY_ID`. An empty or disallowed stored image
/// is replaced with an id-keyed placeholder before responding.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<NewsArticle>> {
    let id = parse_article_id(&raw_id)?;
    let published_only = !state.config().expose_unpublished_by_id;

    let mut article = NewsRepository::new(state.pool())
        .find_by_id(id, published_only)
        .await?
        .ok_or_else(not_found)?;

    article.image = Some(placeholders::effective_image(article.image.as_deref(), id));

    Ok(Json(article))
}

/// `POST /api/news` (gated)
///
/// Creates a published article. The image is assigned round-robin from the
/// bundled placeholder set, keyed on the live article count; the author
/// string is the admin's name (or email) at creation time.
#[instrument(skip(state, payload), fields(admin = %admin.email))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<NewsPayload>,
) -> Result<(StatusCode, Json<NewsArticle>)> {
    let fields = validate_payload(payload)?;
    let repo = NewsRepository::new(state.pool());

    let count = repo.count().await?;
    let image = placeholders::assign_by_count(count);
    let read_time = estimate_read_time(&fields.content);

    let article = repo
        .create(&fields, image, admin.display_name(), &read_time, admin.id)
        .await?;

    tracing::info!(article_id = %article.id, "News article created");
    Ok((StatusCode::CREATED, Json(article)))
}

/// `PUT /api/news/{id}` (gated)
#[instrument(skip(state, payload), fields(admin = %admin.email))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw_id): Path<String>,
    Json(payload): Json<NewsPayload>,
) -> Result<Json<NewsArticle>> {
    let id = parse_article_id(&raw_id)?;
    let fields = validate_payload(payload)?;
    let read_time = estimate_read_time(&fields.content);

    let article = NewsRepository::new(state.pool())
        .update(id, &fields, &read_time)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(article_id = %article.id, "News article updated");
    Ok(Json(article))
}

/// `DELETE /api/news/{id}` (gated)
///
/// When the article carries an externally stored image (a URL rather than a
/// bundled placeholder path), its removal is attempted best-effort before
/// the row delete, mirroring project deletion.
#[instrument(skip(state), fields(admin = %admin.email))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_article_id(&raw_id)?;
    let repo = NewsRepository::new(state.pool());

    let existing = repo.find_by_id(id, false).await?.ok_or_else(not_found)?;

    if let Some(image_url) = remote_image(existing.image.as_deref())
        && let Err(e) = state.media().remove(image_url).await
    {
        tracing::warn!(url = %image_url, error = %e, "Failed to remove stored image");
    }

    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(not_found());
    }

    tracing::info!(article_id = %id, "News article deleted");
    Ok(Json(json!({ "message": "News article deleted successfully" })))
}

/// Parse a path id. Non-numeric ids behave like unknown ids (404), not like
/// malformed requests.
fn parse_article_id(raw: &str) -> Result<NewsArticleId> {
    raw.parse::<i32>()
        .map(NewsArticleId::new)
        .map_err(|_| not_found())
}

fn not_found() -> AppError {
    AppError::NotFound("News article not found".to_owned())
}

/// The externally stored image reference of an article, if any.
///
/// Bundled placeholder paths (relative, leading `/`) live with the frontend
/// and must never be handed to the media store; only absolute URLs are.
fn remote_image(stored: Option<&str>) -> Option<&str> {
    let value = stored?.trim();
    if value.is_empty() || value.starts_with('/') {
        None
    } else {
        Some(value)
    }
}

/// Validate the request body: all four fields present and non-blank.
fn validate_payload(payload: NewsPayload) -> Result<NewNewsArticle> {
    let title = non_blank(payload.title);
    let summary = non_blank(payload.summary);
    let content = non_blank(payload.content);
    let category = non_blank(payload.category);

    match (title, summary, content, category) {
        (Some(title), Some(summary), Some(content), Some(category)) => Ok(NewNewsArticle {
            title,
            summary,
            content,
            category,
        }),
        _ => Err(AppError::BadRequest(
            "Title, summary, content and category are required".to_owned(),
        )),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(
        title: Option<&str>,
        summary: Option<&str>,
        content: Option<&str>,
        category: Option<&str>,
    ) -> NewsPayload {
        NewsPayload {
            title: title.map(str::to_owned),
            summary: summary.map(str::to_owned),
            content: content.map(str::to_owned),
            category: category.map(str::to_owned),
        }
    }

    #[test]
    fn test_validate_payload_accepts_complete_input() {
        let fields = validate_payload(payload(Some(" T "), Some("S"), Some("C"), Some("Cat")))
            .expect("valid payload");
        assert_eq!(fields.title, "T");
        assert_eq!(fields.category, "Cat");
    }

    #[test]
    fn test_validate_payload_rejects_missing_or_blank_fields() {
        let cases = [
            payload(None, Some("S"), Some("C"), Some("Cat")),
            payload(Some("T"), Some("  "), Some("C"), Some("Cat")),
            payload(Some("T"), Some("S"), Some(""), Some("Cat")),
            payload(Some("T"), Some("S"), Some("C"), None),
        ];

        for case in cases {
            let err = validate_payload(case).expect_err("rejected");
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[test]
    fn test_remote_image_skips_placeholders_and_blanks() {
        assert_eq!(remote_image(None), None);
        assert_eq!(remote_image(Some("")), None);
        assert_eq!(remote_image(Some("   ")), None);
        assert_eq!(remote_image(Some("/images/news/skyline.jpg")), None);
    }

    #[test]
    fn test_remote_image_keeps_external_urls() {
        let url = "https://res.cloudinary.com/manara/image/upload/v1/manara/news/a.jpg";
        assert_eq!(remote_image(Some(url)), Some(url));
    }

    #[test]
    fn test_parse_article_id_maps_garbage_to_not_found() {
        assert!(parse_article_id("12").is_ok());
        assert!(matches!(
            parse_article_id("unknown-id"),
            Err(AppError::NotFound(msg)) if msg == "News article not found"
        ));
    }
}
