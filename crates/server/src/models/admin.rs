//! Administrator model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use manara_core::AdminId;

/// An administrator identity.
///
/// Rows are created on first allow-listed login (or pre-seeded via the CLI)
/// and never deleted by the system itself.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: AdminId,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public fields of an administrator, as returned by the auth endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProfile {
    pub id: AdminId,
    pub email: String,
    pub name: Option<String>,
}

impl Admin {
    /// Public view of this administrator (id, email, name only).
    #[must_use]
    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }

    /// Display string used as the article author: the name when set,
    /// otherwise the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
