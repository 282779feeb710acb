//! External image storage.
//!
//! The store is expressed as a trait so handlers depend on a capability, not
//! on Cloudinary directly; tests inject a mock to simulate upload and
//! deletion failures deterministically.
//!
//! Deletion is best-effort by contract: callers log and swallow `remove`
//! failures, because the user-facing mutation (row update/delete) has
//! already been decided independently.

use async_trait::async_trait;
use thiserror::Error;

pub mod cloudinary;

pub use cloudinary::CloudinaryStore;

/// Maximum accepted upload size.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Errors from the media store.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The payload is not an image content type.
    #[error("only image files are allowed")]
    NotAnImage,

    /// The payload exceeds the size limit.
    #[error("upload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    /// The image store rejected the request.
    #[error("image store rejected the request: {0}")]
    Upload(String),

    /// Transport-level failure talking to the image store.
    #[error("image store transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// External binary-object storage for uploaded images.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload an image and return its durable, publicly fetchable URL.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::NotAnImage` for non-image content types,
    /// `MediaError::TooLarge` for oversized payloads, and
    /// `MediaError::Upload`/`MediaError::Transport` on service failures.
    async fn store(
        &self,
        data: Vec<u8>,
        content_type: &str,
        folder: &str,
    ) -> Result<String, MediaError>;

    /// Delete a previously stored image by its URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage key cannot be derived or the delete
    /// call fails. Callers treat this as best-effort and never propagate it.
    async fn remove(&self, url: &str) -> Result<(), MediaError>;
}

/// Validate an upload before it leaves the process.
///
/// # Errors
///
/// Returns `MediaError::NotAnImage` unless the content type is `image/*`,
/// and `MediaError::TooLarge` when the payload exceeds [`MAX_IMAGE_BYTES`].
pub fn validate_upload(content_type: &str, size: usize) -> Result<(), MediaError> {
    if !content_type.starts_with("image/") {
        return Err(MediaError::NotAnImage);
    }

    if size > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }

    Ok(())
}
