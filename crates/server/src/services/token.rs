//! Admin token issuing and verification.
//!
//! Tokens are stateless HS256 JWTs with a fixed 24-hour validity window.
//! No server-side session store exists: logout is a client-side no-op and a
//! token stays valid until it expires or its admin row disappears (the
//! access gate re-checks the row on every request).

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use manara_core::AdminId;

/// Fixed validity window for issued tokens.
const TOKEN_TTL_HOURS: i64 = 24;

/// Errors from the token service.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing the claims failed.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Signature, expiry, or claim-shape verification failed. The specific
    /// reason is deliberately not exposed.
    #[error("token verification failed")]
    Verification,
}

/// Claims embedded in an admin token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the administrator id, as a string per JWT convention.
    pub sub: String,
    /// Administrator email at issuance time.
    pub email: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// The administrator id carried in the `sub` claim.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Verification` if the subject is not a valid id.
    pub fn admin_id(&self) -> Result<AdminId, TokenError> {
        self.sub
            .parse::<i32>()
            .map(AdminId::new)
            .map_err(|_| TokenError::Verification)
    }
}

/// Issues and verifies admin tokens with a process-wide signing secret.
///
/// The secret is loaded once at startup; a missing secret is a fatal startup
/// condition, so the service can never silently issue unverifiable tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Build a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a signed token for an administrator, valid for 24 hours.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, admin_id: AdminId, email: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(admin_id, email, Duration::hours(TOKEN_TTL_HOURS))
    }

    fn issue_with_ttl(
        &self,
        admin_id: AdminId,
        email: &str,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: admin_id.to_string(),
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Verification` on any failure: bad signature,
    /// expired, or malformed. Callers must not distinguish the reasons.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| TokenError::Verification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("unit-test-signing-key-0123456789ab"))
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let svc = service();
        let token = svc
            .issue(AdminId::new(7), "editor@manara.media")
            .expect("issue");

        let claims = svc.verify(&token).expect("verify");
        assert_eq!(claims.admin_id().expect("id"), AdminId::new(7));
        assert_eq!(claims.email, "editor@manara.media");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = service()
            .issue(AdminId::new(1), "editor@manara.media")
            .expect("issue");

        let other = TokenService::new(&SecretString::from("a-completely-different-key-456789"));
        assert!(matches!(
            other.verify(&token),
            Err(TokenError::Verification)
        ));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let svc = service();
        // Well past the default 60s validation leeway.
        let token = svc
            .issue_with_ttl(AdminId::new(1), "editor@manara.media", Duration::hours(-2))
            .expect("issue");

        assert!(matches!(svc.verify(&token), Err(TokenError::Verification)));
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let svc = service();
        let token = svc
            .issue(AdminId::new(1), "editor@manara.media")
            .expect("issue");

        // Corrupt the signature segment.
        let mut tampered = token;
        tampered.pop();
        tampered.push('x');
        assert!(matches!(
            svc.verify(&tampered),
            Err(TokenError::Verification)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(matches!(
            service().verify("not-a-jwt"),
            Err(TokenError::Verification)
        ));
    }

    #[test]
    fn test_claims_with_bad_subject_are_rejected() {
        let claims = Claims {
            sub: "not-a-number".to_owned(),
            email: "editor@manara.media".to_owned(),
            iat: 0,
            exp: 0,
        };
        assert!(matches!(claims.admin_id(), Err(TokenError::Verification)));
    }
}
