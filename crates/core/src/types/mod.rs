//! Shared domain types.

pub mod email;
pub mod id;
pub mod kind;

pub use email::{Email, EmailError};
pub use id::{AdminId, NewsArticleId, ProjectId};
pub use kind::{ProjectKind, ProjectKindError};
