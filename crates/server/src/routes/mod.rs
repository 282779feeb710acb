//! HTTP route handlers for the content API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (verifies database)
//!
//! # Auth
//! POST /api/auth/login          - Allow-listed email login, returns a token
//! GET  /api/auth/verify         - Validate the bearer token (gated)
//! POST /api/auth/logout         - Stateless no-op
//!
//! # News (public reads, gated writes)
//! GET    /api/news              - Published articles, newest first
//! GET    /api/news/{id}         - Single article
//! POST   /api/news              - Create article (gated, JSON body)
//! PUT    /api/news/{id}         - Update article (gated)
//! DELETE /api/news/{id}         - Delete article (gated)
//!
//! # Projects (public reads, gated writes)
//! GET    /api/projects          - Published projects, newest first
//! GET    /api/projects/{id}     - Single project
//! POST   /api/projects          - Create project (gated, multipart)
//! PUT    /api/projects/{id}     - Update project (gated, multipart)
//! DELETE /api/projects/{id}     - Delete project (gated)
//! ```

pub mod auth;
pub mod news;
pub mod projects;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::services::media::MAX_IMAGE_BYTES;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/verify", get(auth::verify))
        .route("/logout", post(auth::logout))
}

/// Create the news routes router.
pub fn news_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(news::list).post(news::create))
        .route(
            "/{id}",
            get(news::show).put(news::update).delete(news::remove),
        )
}

/// Create the project routes router.
///
/// The body limit leaves headroom over the 5 MiB image cap for the other
/// multipart fields; the cap itself is enforced by the media store.
pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::show)
                .put(projects::update)
                .delete(projects::remove),
        )
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024))
}

/// Assemble all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/news", news_routes())
        .nest("/api/projects", project_routes())
}
