//! Cloudinary-backed [`MediaStore`] implementation.
//!
//! Uploads go to `POST /v1_1/{cloud}/image/upload` as signed multipart
//! requests; deletes go to `POST /v1_1/{cloud}/image/destroy`. Requests are
//! signed with SHA-256 over the sorted parameter string plus the API secret.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use crate::config::CloudinaryConfig;

use super::{MediaError, MediaStore, validate_upload};

/// Folder prefix under which all Manara assets live in the cloud.
const ROOT_FOLDER: &str = "manara";

/// Cloudinary image store.
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

/// Successful upload response (fields we use).
#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Destroy response; `result` is `"ok"` or `"not found"`.
#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryStore {
    /// Create a store from the configured Cloudinary credentials.
    #[must_use]
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/{action}",
            self.config.cloud_name
        )
    }

    /// Sign a parameter set: sort by key, join as `k=v` pairs with `&`,
    /// append the API secret, and hash.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        let joined = sorted
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.config.api_secret.expose_secret().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    #[instrument(skip(self, data), fields(size = data.len(), folder = %folder))]
    async fn store(
        &self,
        data: Vec<u8>,
        content_type: &str,
        folder: &str,
    ) -> Result<String, MediaError> {
        validate_upload(content_type, data.len())?;

        let folder = format!("{ROOT_FOLDER}/{folder}");
        let public_id = Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let signature = self.sign(&[
            ("folder", &folder),
            ("public_id", &public_id),
            ("signature_algorithm", "sha256"),
            ("timestamp", &timestamp),
        ]);

        let file_part = reqwest::multipart::Part::bytes(data)
            .file_name(public_id.clone())
            .mime_str(content_type)
            .map_err(|e| MediaError::Upload(format!("invalid content type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.config.api_key.clone())
            .text("folder", folder)
            .text("public_id", public_id)
            .text("signature_algorithm", "sha256")
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Upload(format!("HTTP {status}: {body}")));
        }

        let uploaded: UploadResponse = response.json().await?;
        tracing::info!(url = %uploaded.secure_url, "Image uploaded");
        Ok(uploaded.secure_url)
    }

    #[instrument(skip(self))]
    async fn remove(&self, url: &str) -> Result<(), MediaError> {
        let public_id = public_id_from_url(url)
            .ok_or_else(|| MediaError::Upload(format!("cannot derive public id from {url}")))?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("public_id", &public_id),
            ("signature_algorithm", "sha256"),
            ("timestamp", &timestamp),
        ]);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("api_key", self.config.api_key.as_str()),
                ("public_id", &public_id),
                ("signature_algorithm", "sha256"),
                ("timestamp", &timestamp),
                ("signature", &signature),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Upload(format!("HTTP {status}: {body}")));
        }

        let destroyed: DestroyResponse = response.json().await?;
        if destroyed.result != "ok" && destroyed.result != "not found" {
            return Err(MediaError::Upload(format!(
                "destroy returned {:?}",
                destroyed.result
            )));
        }

        tracing::info!(public_id = %public_id, result = %destroyed.result, "Image removed");
        Ok(())
    }
}

/// Derive the Cloudinary public id from a delivery URL.
///
/// Takes the path segments after `upload`, skips a version segment
/// (`v<digits>`) when present, and strips the file extension from the last
/// segment. Returns `None` for URLs that don't look like Cloudinary
/// delivery URLs.
#[must_use]
pub fn public_id_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();

    let upload_pos = segments.iter().position(|s| *s == "upload")?;
    let mut rest = segments.get(upload_pos + 1..)?;

    if let Some((first, tail)) = rest.split_first()
        && is_version_segment(first)
    {
        rest = tail;
    }

    if rest.is_empty() {
        return None;
    }

    let mut parts: Vec<&str> = rest.to_vec();
    let last = parts.pop()?;
    let stem = last.rsplit_once('.').map_or(last, |(stem, _ext)| stem);
    if stem.is_empty() {
        return None;
    }
    parts.push(stem);

    Some(parts.join("/"))
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_public_id_with_version_and_folder() {
        let url =
            "https://res.cloudinary.com/manara/image/upload/v1699999999/manara/projects/abc123.jpg";
        assert_eq!(
            public_id_from_url(url).as_deref(),
            Some("manara/projects/abc123")
        );
    }

    #[test]
    fn test_public_id_without_version() {
        let url = "https://res.cloudinary.com/manara/image/upload/manara/news/photo.png";
        assert_eq!(
            public_id_from_url(url).as_deref(),
            Some("manara/news/photo")
        );
    }

    #[test]
    fn test_public_id_flat_asset() {
        let url = "https://res.cloudinary.com/manara/image/upload/v17/tower.webp";
        assert_eq!(public_id_from_url(url).as_deref(), Some("tower"));
    }

    #[test]
    fn test_public_id_rejects_foreign_urls() {
        assert_eq!(public_id_from_url("https://example.com/a/b/c.jpg"), None);
        assert_eq!(public_id_from_url("not a url"), None);
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/manara/image/upload/"),
            None
        );
    }

    #[test]
    fn test_version_segment_detection() {
        assert!(is_version_segment("v1"));
        assert!(is_version_segment("v1699999999"));
        assert!(!is_version_segment("v"));
        assert!(!is_version_segment("video"));
        assert!(!is_version_segment("manara"));
    }

    #[test]
    fn test_signature_known_vector() {
        let store = CloudinaryStore::new(CloudinaryConfig {
            cloud_name: "manara".to_owned(),
            api_key: "key".to_owned(),
            api_secret: SecretString::from("testsecret"),
        });

        // Deliberately unsorted input; signing must sort by key.
        let signature = store.sign(&[
            ("timestamp", "1700000000"),
            ("public_id", "abc"),
            ("folder", "manara/projects"),
            ("signature_algorithm", "sha256"),
        ]);

        assert_eq!(
            signature,
            "00a9d9c9e912f44a2d88ec3bb3244d5b9fc5bcfdf612d4a58e1c33f54e809c6a"
        );
    }
}
