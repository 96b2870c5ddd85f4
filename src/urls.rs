//! URL construction and normalization.
//!
//! Article URLs are `/{category}/{slug}` on the site and
//! `{hostname}/{category}/{slug}` in the feed. Legacy category prefixes are
//! mapped to current ones through the configured rewrite table; the pipeline
//! itself only ever produces current category keys.

use crate::config::Rewrite;
use std::collections::BTreeMap;

/// Site-relative article URL.
pub fn article_path(category: &str, slug: &str) -> String {
    format!("/{category}/{slug}")
}

/// Absolute, canonical article URL. Used as both feed item id and link.
pub fn canonical_url(hostname: &str, category: &str, slug: &str) -> String {
    absolute_url(hostname, &article_path(category, slug))
}

/// Join a root-relative path onto the site origin.
///
/// Paths that are already absolute `http(s)://` URLs are returned unchanged.
pub fn absolute_url(hostname: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let host = hostname.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{host}{path}")
    } else {
        format!("{host}/{path}")
    }
}

/// Normalize a URL for comparison: percent-decode, drop trailing slashes and
/// a `.html` suffix, lowercase. Undecodable input is normalized as-is.
pub fn normalize_url(url: &str) -> String {
    let decoded = urlencoding::decode(url)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| url.to_string());
    let trimmed = decoded.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".html").unwrap_or(trimmed);
    trimmed.to_lowercase()
}

/// First non-empty path segment, e.g. `backend` for `/backend/article`.
pub fn category_from_url(url: &str) -> &str {
    url.split('/').find(|s| !s.is_empty()).unwrap_or("")
}

/// Map a legacy path (`/dotnet/x`) to its current location (`/backend/x`).
///
/// Returns `None` when the path's category is not a legacy prefix.
pub fn apply_rewrites(path: &str, rewrites: &[Rewrite]) -> Option<String> {
    let category = category_from_url(path);
    let rewrite = rewrites.iter().find(|r| r.from == category)?;
    let rest = path
        .trim_start_matches('/')
        .strip_prefix(category)
        .unwrap_or("");
    Some(format!("/{}{}", rewrite.to, rest))
}

/// Groups of URLs that normalize to the same value.
///
/// Each group lists the colliding URLs in input order. Groups are ordered by
/// normalized URL.
pub fn find_collisions<'a, I>(urls: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for url in urls {
        groups
            .entry(normalize_url(url))
            .or_default()
            .push(url.to_string());
    }
    groups.into_values().filter(|g| g.len() > 1).collect()
}
