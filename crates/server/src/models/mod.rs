//! Database-backed domain models.

pub mod admin;
pub mod news;
pub mod project;

pub use admin::{Admin, AdminProfile};
pub use news::{Creator, NewNewsArticle, NewsArticle, NewsListItem};
pub use project::{NewProject, Project, ProjectListItem};
