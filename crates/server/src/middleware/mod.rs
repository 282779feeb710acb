//! Request-level middleware.

pub mod auth;

pub use auth::RequireAdmin;
