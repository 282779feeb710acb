//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::db::{AdminDirectory, PgAdminDirectory};
use crate::services::media::{CloudinaryStore, MediaStore};
use crate::services::token::TokenService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; the only in-process shared state is the
/// connection pool and the configuration loaded once at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    tokens: TokenService,
    media: Arc<dyn MediaStore>,
    admins: Arc<dyn AdminDirectory>,
}

impl AppState {
    /// Create the application state with the Cloudinary-backed media store.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let media = Arc::new(CloudinaryStore::new(config.cloudinary.clone()));
        Self::with_media(config, pool, media)
    }

    /// Create the application state with an injected media store.
    ///
    /// Tests use this to substitute a mock store and simulate upload or
    /// deletion failures.
    #[must_use]
    pub fn with_media(config: ServerConfig, pool: PgPool, media: Arc<dyn MediaStore>) -> Self {
        let admins = Arc::new(PgAdminDirectory::new(pool.clone()));
        Self::with_stores(config, pool, media, admins)
    }

    /// Create the application state with injected media and admin-lookup
    /// backends.
    ///
    /// Tests use this to exercise the access gate against a fixed set of
    /// administrator rows.
    #[must_use]
    pub fn with_stores(
        config: ServerConfig,
        pool: PgPool,
        media: Arc<dyn MediaStore>,
        admins: Arc<dyn AdminDirectory>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                media,
                admins,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the media store.
    #[must_use]
    pub fn media(&self) -> &Arc<dyn MediaStore> {
        &self.inner.media
    }

    /// Get a reference to the administrator directory.
    #[must_use]
    pub fn admins(&self) -> &Arc<dyn AdminDirectory> {
        &self.inner.admins
    }
}
