//! Real-estate project listing models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use manara_core::{AdminId, ProjectId, ProjectKind};

use super::news::Creator;

/// A real-estate project listing.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub location: String,
    /// Free-text price string, e.g. "From 1.2M AED".
    pub price: String,
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    pub description: Option<String>,
    pub image: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub created_by: AdminId,
}

/// A published project joined with its creator, as returned by the feed.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ProjectListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    #[sqlx(flatten)]
    #[serde(rename = "createdBy")]
    pub creator: Creator,
}

/// Validated fields for creating or updating a project listing.
///
/// Title, location, price and kind are mandatory; description is optional.
/// Validation happens at the route boundary before this struct is built.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub location: String,
    pub price: String,
    pub kind: ProjectKind,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_serializes_kind_as_type() {
        let project = Project {
            id: ProjectId::new(4),
            title: "Marina Towers".to_owned(),
            location: "Dubai Marina".to_owned(),
            price: "From 1.2M AED".to_owned(),
            kind: ProjectKind::Residential,
            description: None,
            image: Some(
                "https://res.cloudinary.com/manara/image/upload/v1/manara/projects/a.jpg"
                    .to_owned(),
            ),
            published: true,
            published_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: AdminId::new(1),
        };

        let json = serde_json::to_value(&project).expect("serialize");
        assert_eq!(json["type"], "residential");
        assert_eq!(json["price"], "From 1.2M AED");
        assert!(json.get("kind").is_none());
        assert!(json.get("createdBy").is_none());
    }
}
