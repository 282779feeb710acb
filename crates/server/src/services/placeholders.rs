//! Default images for news articles.
//!
//! News has no per-article upload path: a fixed set of bundled placeholder
//! images is assigned round-robin at creation time, keyed on the live
//! article count. The index is deliberately non-stable (a deleted row shifts
//! later assignments); this is observable, documented behavior, not a bug.
//!
//! On single-article reads the stored value is re-checked: an empty value or
//! a reference to a disallowed external host is replaced with a placeholder
//! keyed on the article id, so a given article always renders the same one.

use manara_core::NewsArticleId;
use url::Url;

/// Placeholder images bundled with the frontend, served as relative paths.
pub const DEFAULT_NEWS_IMAGES: &[&str] = &[
    "/images/news/skyline.jpg",
    "/images/news/market-trends.jpg",
    "/images/news/construction.jpg",
    "/images/news/interiors.jpg",
    "/images/news/waterfront.jpg",
    "/images/news/masterplan.jpg",
];

/// Hosts an externally stored image reference may point at.
const ALLOWED_IMAGE_HOSTS: &[&str] = &["res.cloudinary.com"];

/// Placeholder assigned to a newly created article, keyed on the current
/// article count.
#[must_use]
pub fn assign_by_count(count: i64) -> &'static str {
    nth(count)
}

/// Placeholder re-assigned at read time, keyed on the article id so repeated
/// reads of the same article are stable.
#[must_use]
pub fn assign_by_id(id: NewsArticleId) -> &'static str {
    nth(i64::from(id.as_i32()))
}

fn nth(n: i64) -> &'static str {
    let index = usize::try_from(n.rem_euclid(len_i64())).unwrap_or(0);
    DEFAULT_NEWS_IMAGES
        .get(index)
        .copied()
        .unwrap_or("/images/news/skyline.jpg")
}

/// Whether a stored image reference is acceptable to serve: a relative path
/// into the bundled assets, or an absolute URL on an allowed host.
#[must_use]
pub fn is_allowed_image(value: &str) -> bool {
    if value.starts_with('/') {
        return true;
    }

    Url::parse(value).is_ok_and(|url| {
        url.host_str()
            .is_some_and(|host| ALLOWED_IMAGE_HOSTS.contains(&host))
    })
}

/// The image to serve for an article: the stored reference when present and
/// allowed, otherwise an id-keyed placeholder.
#[must_use]
pub fn effective_image(stored: Option<&str>, id: NewsArticleId) -> String {
    match stored {
        Some(value) if !value.trim().is_empty() && is_allowed_image(value) => value.to_owned(),
        _ => assign_by_id(id).to_owned(),
    }
}

#[allow(clippy::cast_possible_wrap)] // The placeholder set is tiny.
const fn len_i64() -> i64 {
    DEFAULT_NEWS_IMAGES.len() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_by_count_rotates() {
        assert_eq!(assign_by_count(0), DEFAULT_NEWS_IMAGES[0]);
        assert_eq!(assign_by_count(1), DEFAULT_NEWS_IMAGES[1]);
        let len = i64::try_from(DEFAULT_NEWS_IMAGES.len()).expect("fits");
        assert_eq!(assign_by_count(len), DEFAULT_NEWS_IMAGES[0]);
        assert_eq!(assign_by_count(len + 2), DEFAULT_NEWS_IMAGES[2]);
    }

    #[test]
    fn test_assign_by_id_is_stable() {
        let id = NewsArticleId::new(11);
        assert_eq!(assign_by_id(id), assign_by_id(id));
    }

    #[test]
    fn test_is_allowed_image() {
        assert!(is_allowed_image("/images/news/skyline.jpg"));
        assert!(is_allowed_image(
            "https://res.cloudinary.com/manara/image/upload/v1/manara/news/a.jpg"
        ));

        assert!(!is_allowed_image("https://evil.example.com/a.jpg"));
        assert!(!is_allowed_image("not a url"));
    }

    #[test]
    fn test_effective_image_keeps_allowed_values() {
        let id = NewsArticleId::new(3);
        assert_eq!(
            effective_image(Some("/images/news/custom.jpg"), id),
            "/images/news/custom.jpg"
        );
    }

    #[test]
    fn test_effective_image_replaces_empty_and_foreign() {
        let id = NewsArticleId::new(3);
        let expected = assign_by_id(id).to_owned();

        assert_eq!(effective_image(None, id), expected);
        assert_eq!(effective_image(Some(""), id), expected);
        assert_eq!(effective_image(Some("   "), id), expected);
        assert_eq!(
            effective_image(Some("https://hotlink.example.net/x.png"), id),
            expected
        );
    }
}
