//! HTTP-level tests for the request paths that resolve before any database
//! round-trip: health liveness, login validation and allow-listing, the
//! access gate rejections, and logout.
//!
//! The pool is created lazily and never connected; any test that reached the
//! database would fail, which is itself an assertion that these paths do not.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use chrono::Utc;
use manara_core::AdminId;
use manara_server::build_router;
use manara_server::config::{CloudinaryConfig, ServerConfig};
use manara_server::db::{AdminDirectory, RepositoryError};
use manara_server::models::Admin;
use manara_server::services::media::{MediaError, MediaStore};
use manara_server::services::token::TokenService;
use manara_server::state::AppState;

/// Media store that records nothing and always succeeds.
struct NullMediaStore;

#[async_trait]
impl MediaStore for NullMediaStore {
    async fn store(
        &self,
        _data: Vec<u8>,
        _content_type: &str,
        _folder: &str,
    ) -> Result<String, MediaError> {
        Ok("https://res.cloudinary.com/test/image/upload/v1/test.jpg".to_owned())
    }

    async fn remove(&self, _url: &str) -> Result<(), MediaError> {
        Ok(())
    }
}

/// Directory holding a fixed set of administrator rows.
struct FixedAdminDirectory(Vec<Admin>);

#[async_trait]
impl AdminDirectory for FixedAdminDirectory {
    async fn find_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        Ok(self.0.iter().find(|admin| admin.id == id).cloned())
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("postgres://localhost:1/manara_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:4000".to_owned(),
        frontend_origin: None,
        jwt_secret: SecretString::from("0123456789abcdef0123456789abcdef"),
        admin_emails: vec!["editor@manara.media".to_owned()],
        cloudinary: CloudinaryConfig {
            cloud_name: "test".to_owned(),
            api_key: "key".to_owned(),
            api_secret: SecretString::from("shhh"),
        },
        expose_unpublished_by_id: true,
        sentry_dsn: None,
    }
}

fn app() -> Router {
    let config = test_config();
    // Lazy pool: no connection is made until a query runs.
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost:1/manara_test")
        .unwrap();
    let state = AppState::with_media(config, pool, Arc::new(NullMediaStore));
    build_router(state)
}

fn app_with_admins(admins: Vec<Admin>) -> Router {
    let config = test_config();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost:1/manara_test")
        .unwrap();
    let state = AppState::with_stores(
        config,
        pool,
        Arc::new(NullMediaStore),
        Arc::new(FixedAdminDirectory(admins)),
    );
    build_router(state)
}

fn token_for(id: AdminId, email: &str) -> String {
    // Same secret as test_config, so the signature verifies.
    let tokens = TokenService::new(&SecretString::from(
        "0123456789abcdef0123456789abcdef",
    ));
    tokens.issue(id, email).unwrap()
}

fn admin_row(id: AdminId, email: &str) -> Admin {
    Admin {
        id,
        email: email.to_owned(),
        name: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn login_without_email_is_bad_request() {
    let request = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["error"], "Email is required");
}

#[tokio::test]
async fn login_with_blank_email_is_bad_request() {
    let request = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "email": "   " }).to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_malformed_email_is_bad_request() {
    let request = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "email": "not-an-email" }).to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["error"], "Invalid email address");
}

#[tokio::test]
async fn login_with_non_listed_email_is_forbidden() {
    let request = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "intruder@example.com" }).to_string(),
        ))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["error"], "Access denied. Not an authorized admin email.");
}

#[tokio::test]
async fn allow_list_check_ignores_email_case() {
    // Uppercase form of a listed email must NOT be forbidden; it proceeds to
    // the (unreachable) database and surfaces as a 500 instead of a 403.
    let request = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "Editor@Manara.Media" }).to_string(),
        ))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_ne!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn write_without_token_is_unauthorized() {
    let request = Request::post("/api/news")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "title": "T" }).to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["error"], "Authentication token required");
}

#[tokio::test]
async fn write_with_garbage_token_is_unauthorized() {
    let request = Request::delete("/api/projects/1")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn token_for_deleted_admin_is_rejected() {
    // The signature still verifies; only the admin row is gone.
    let token = token_for(AdminId::new(42), "editor@manara.media");

    let response = app_with_admins(Vec::new())
        .oneshot(
            Request::get("/api/auth/verify")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["error"], "Admin account no longer exists");
}

#[tokio::test]
async fn valid_token_for_existing_admin_passes_the_gate() {
    let id = AdminId::new(42);
    let token = token_for(id, "editor@manara.media");

    let response = app_with_admins(vec![admin_row(id, "editor@manara.media")])
        .oneshot(
            Request::get("/api/auth/verify")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["message"], "Token is valid");
    assert_eq!(body["admin"]["email"], "editor@manara.media");
}

#[tokio::test]
async fn verify_without_token_is_unauthorized() {
    let response = app()
        .oneshot(
            Request::get("/api/auth/verify")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_succeeds_without_credentials() {
    let response = app()
        .oneshot(
            Request::post("/api/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["message"], "Logged out successfully");
}
