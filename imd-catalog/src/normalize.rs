//! Field normalizers for master sheet cells.
//!
//! Sheet cells are typed by hand, so the same value shows up in several
//! shapes: a Spotify artist id may be pasted as a bare id or a share URL, a
//! social account as `@handle`, `handle`, or a profile URL. These helpers
//! reduce each shape to the value stored in the database.

use url::Url;

/// Normalize a slug cell.
///
/// Returns `None` when the cell is empty or the lowercased value contains
/// anything other than ASCII lowercase letters, digits, and hyphens. The
/// latter case is logged, since it usually means a typo in the sheet.
pub fn normalize_slug(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let slug = raw.trim().to_lowercase();
    if slug.is_empty() {
        return None;
    }
    if !is_valid_slug(&slug) {
        log::warn!("Slug does not match [a-z0-9-]+, skipping: \"{}\"", raw);
        return None;
    }
    Some(slug)
}

/// Check a slug against `^[a-z0-9-]+$`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Extract a Spotify artist id from either a bare id or an
/// `open.spotify.com` URL.
///
/// # Examples
///
/// ```
/// use imd_catalog::normalize::extract_spotify_id;
///
/// assert_eq!(
///     extract_spotify_id("https://open.spotify.com/artist/abc123?si=xyz"),
///     "abc123"
/// );
/// assert_eq!(extract_spotify_id("abc123"), "abc123");
/// ```
pub fn extract_spotify_id(value: &str) -> String {
    if !value.contains("open.spotify.com") {
        return value.to_string();
    }
    let without_query = value.split('?').next().unwrap_or(value);
    without_query
        .rsplit('/')
        .next()
        .unwrap_or(without_query)
        .to_string()
}

/// Canonical artist page for a Spotify id.
pub fn spotify_artist_url(id: &str) -> String {
    format!("https://open.spotify.com/artist/{id}")
}

/// Extract an account handle from a profile URL or a literal handle.
///
/// Absolute URLs yield their first non-empty path segment; anything that
/// does not parse as a URL is taken as the handle itself. A single leading
/// `@` is dropped in both cases.
///
/// # Examples
///
/// ```
/// use imd_catalog::normalize::extract_handle;
///
/// assert_eq!(extract_handle("https://x.com/handle").as_deref(), Some("handle"));
/// assert_eq!(extract_handle("@handle").as_deref(), Some("handle"));
/// assert_eq!(extract_handle("https://x.com/"), None);
/// ```
pub fn extract_handle(value: &str) -> Option<String> {
    match Url::parse(value) {
        Ok(url) => url
            .path()
            .split('/')
            .find(|segment| !segment.is_empty())
            .map(|segment| strip_at(segment).to_string()),
        Err(_) => {
            let handle = strip_at(value);
            if handle.is_empty() {
                None
            } else {
                Some(handle.to_string())
            }
        }
    }
}

fn strip_at(s: &str) -> &str {
    s.strip_prefix('@').unwrap_or(s)
}

/// Trimmed cell contents, or `None` for empty and whitespace-only cells.
pub fn non_blank(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("abc-123"));
        assert!(is_valid_slug("-"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("abc_123"));
        assert!(!is_valid_slug("abc 123"));
        assert!(!is_valid_slug("ÄBC"));
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(Some("  x  ")), Some("x"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
