//! News article models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use manara_core::{AdminId, NewsArticleId};

/// Words per minute assumed when estimating read time.
const READING_WORDS_PER_MINUTE: usize = 200;

/// A magazine news article.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: NewsArticleId,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: String,
    pub image: Option<String>,
    pub author: String,
    pub read_time: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub created_by: AdminId,
}

/// The creator fields joined into public list responses.
///
/// Deliberately only email and name; the full admin record is never exposed
/// on public reads.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Creator {
    #[sqlx(rename = "creator_email")]
    pub email: String,
    #[sqlx(rename = "creator_name")]
    pub name: Option<String>,
}

/// A published article joined with its creator, as returned by the feed.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct NewsListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub article: NewsArticle,
    #[sqlx(flatten)]
    #[serde(rename = "createdBy")]
    pub creator: Creator,
}

/// Validated fields for creating or updating a news article.
///
/// All four fields are mandatory non-empty strings; validation happens at
/// the route boundary before this struct is constructed.
#[derive(Debug, Clone)]
pub struct NewNewsArticle {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: String,
}

/// Estimate the read time of an article body, e.g. `"3 min read"`.
///
/// Assumes 200 words per minute and never reports less than one minute.
#[must_use]
pub fn estimate_read_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(READING_WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_read_time_short_content() {
        assert_eq!(estimate_read_time("a short note"), "1 min read");
        assert_eq!(estimate_read_time(""), "1 min read");
    }

    #[test]
    fn test_estimate_read_time_rounds_up() {
        let words_201 = "word ".repeat(201);
        assert_eq!(estimate_read_time(&words_201), "2 min read");

        let words_400 = "word ".repeat(400);
        assert_eq!(estimate_read_time(&words_400), "2 min read");
    }

    #[test]
    fn test_article_serialization_shape() {
        let article = NewsArticle {
            id: NewsArticleId::new(9),
            title: "T".to_owned(),
            summary: "S".to_owned(),
            content: "C".to_owned(),
            category: "Cat".to_owned(),
            image: Some("/images/news/skyline.jpg".to_owned()),
            author: "Lina".to_owned(),
            read_time: Some("1 min read".to_owned()),
            published: true,
            published_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: AdminId::new(1),
        };

        let json = serde_json::to_value(&article).expect("serialize");
        assert_eq!(json["title"], "T");
        assert_eq!(json["published"], true);
        assert_eq!(json["readTime"], "1 min read");
        assert!(json["publishedAt"].is_string());
        // The owning admin reference stays internal.
        assert!(json.get("createdBy").is_none());
    }

    #[test]
    fn test_list_item_exposes_creator_email_and_name_only() {
        let article = NewsArticle {
            id: NewsArticleId::new(9),
            title: "T".to_owned(),
            summary: "S".to_owned(),
            content: "C".to_owned(),
            category: "Cat".to_owned(),
            image: None,
            author: "Lina".to_owned(),
            read_time: None,
            published: true,
            published_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: AdminId::new(1),
        };
        let item = NewsListItem {
            article,
            creator: Creator {
                email: "editor@manara.media".to_owned(),
                name: None,
            },
        };

        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["createdBy"]["email"], "editor@manara.media");
        assert!(json["createdBy"].get("id").is_none());
        assert_eq!(json["title"], "T");
    }
}
