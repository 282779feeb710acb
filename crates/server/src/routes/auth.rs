//! Admin authentication route handlers.
//!
//! The scheme is passwordless by design: an email on the statically
//! configured allow-list is the whole credential, and the returned JWT is
//! stateless. The allow-list check runs before any database access, so an
//! email that is not listed can never cause an administrator row to be
//! created.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use manara_core::Email;

use crate::db::AdminRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::AdminProfile;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub admin: AdminProfile,
}

/// `POST /api/auth/login`
///
/// Allow-listed email login. Creates the administrator row on first login;
/// repeated logins are idempotent (at most one row per email).
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let raw = body.email.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(AppError::BadRequest("Email is required".to_owned()));
    }

    let email =
        Email::parse(&raw).map_err(|_| AppError::BadRequest("Invalid email address".to_owned()))?;

    // Allow-list check comes BEFORE any database lookup.
    if !state.config().is_allow_listed(email.as_str()) {
        tracing::warn!(email = %email, "Login attempt with non-listed email");
        return Err(AppError::Forbidden(
            "Access denied. Not an authorized admin email.".to_owned(),
        ));
    }

    let admin = AdminRepository::new(state.pool())
        .find_or_create(email.as_str())
        .await?;

    let token = state
        .tokens()
        .issue(admin.id, &admin.email)
        .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))?;

    tracing::info!(admin_id = %admin.id, "Admin logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_owned(),
        token,
        admin: admin.profile(),
    }))
}

/// `GET /api/auth/verify`
///
/// Confirms the bearer token is valid and its administrator still exists.
pub async fn verify(RequireAdmin(admin): RequireAdmin) -> Json<Value> {
    Json(json!({
        "message": "Token is valid",
        "admin": admin.profile(),
    }))
}

/// `POST /api/auth/logout`
///
/// Stateless no-op: there is no server-side session to destroy. The client
/// discards the token, which otherwise simply expires.
pub async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logged out successfully" }))
}
