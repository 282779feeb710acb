//! Admin access gate.
//!
//! Provides the [`RequireAdmin`] extractor used by every state-mutating
//! content route and by the token-verify endpoint. Public read routes never
//! go through it.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::models::Admin;
use crate::state::AppState;

/// Extractor that requires a valid admin bearer token.
///
/// The check is three-step: the token signature and expiry must verify, the
/// embedded admin id must parse, and the admin row must still exist. A
/// deleted admin invalidates every token it ever received, even though the
/// signatures remain valid.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub Admin);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = bearer_token(header_value).ok_or_else(|| {
            AppError::Unauthenticated("Authentication token required".to_owned())
        })?;

        // Verification failures (bad signature, expired, malformed) all
        // collapse into one 401 via From<TokenError>.
        let claims = state.tokens().verify(token)?;
        let admin_id = claims.admin_id()?;

        let admin = state.admins().find_by_id(admin_id).await?.ok_or_else(|| {
            AppError::Unauthenticated("Admin account no longer exists".to_owned())
        })?;

        Ok(Self(admin))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
#[must_use]
pub fn bearer_token(header_value: Option<&str>) -> Option<&str> {
    let value = header_value?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
