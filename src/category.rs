//! Category discovery and ordering.
//!
//! Every directory at the content root is a category unless it is in the
//! configured ignore set or hidden. Categories listed in the configuration come
//! first, in configuration order; anything else follows alphabetically. Lookups
//! for display name, icon and style never fail: a directory added before the
//! configuration catches up still gets a usable label.

use crate::config::SiteConfig;
use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

/// Fully resolved display metadata for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub class: String,
    /// Position in the configured order; `None` for unconfigured directories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
}

/// List category directory names under the content root.
///
/// Skips regular files, hidden entries and the configured ignore set. The
/// result is sorted by name; use [`CategoryResolver::resolve`] for display order.
pub fn list_content_dirs(root: &Path, config: &SiteConfig) -> std::io::Result<Vec<String>> {
    let mut dirs: Vec<String> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| !name.starts_with('.') && !config.is_ignored(name))
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Orders category keys and resolves their display metadata.
#[derive(Debug, Clone, Copy)]
pub struct CategoryResolver<'a> {
    config: &'a SiteConfig,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Sort keys: configured categories by their configured position, then
    /// unconfigured ones lexicographically.
    pub fn resolve<I, S>(&self, dirs: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = dirs.into_iter().map(Into::into).collect();
        keys.sort_by(|a, b| self.compare(a, b));
        keys
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.rank(a), self.rank(b)) {
            (Some(ra), Some(rb)) => ra.cmp(&rb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }

    pub fn rank(&self, key: &str) -> Option<usize> {
        self.config.categories.iter().position(|c| c.key == key)
    }

    /// Configured name, or the uppercased key.
    pub fn display_name(&self, key: &str) -> String {
        match self.config.category(key) {
            Some(c) => c.name.clone(),
            None => key.to_uppercase(),
        }
    }

    pub fn icon(&self, key: &str) -> &'a str {
        match self.config.category(key) {
            Some(c) => &c.icon,
            None => &self.config.category_fallback.icon,
        }
    }

    pub fn class_name(&self, key: &str) -> &'a str {
        match self.config.category(key) {
            Some(c) => &c.class,
            None => &self.config.category_fallback.class,
        }
    }

    pub fn category(&self, key: &str) -> Category {
        Category {
            key: key.to_string(),
            name: self.display_name(key),
            icon: self.icon(key).to_string(),
            class: self.class_name(key).to_string(),
            rank: self.rank(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver_for(config: &SiteConfig) -> CategoryResolver<'_> {
        CategoryResolver::new(config)
    }

    #[test]
    fn configured_before_unconfigured() {
        let config = SiteConfig::default();
        let resolved = resolver_for(&config).resolve(["frontend", "backend", "unknown-cat"]);
        assert_eq!(resolved, vec!["backend", "frontend", "unknown-cat"]);
    }

    #[test]
    fn full_configured_order() {
        let config = SiteConfig::default();
        let resolved = resolver_for(&config).resolve(["ai", "devops", "data", "frontend", "backend"]);
        assert_eq!(resolved, vec!["backend", "frontend", "data", "devops", "ai"]);
    }

    #[test]
    fn unconfigured_sorted_alphabetically() {
        let config = SiteConfig::default();
        let resolved = resolver_for(&config).resolve(["zeta", "rust", "ai", "alpha"]);
        assert_eq!(resolved, vec!["ai", "alpha", "rust", "zeta"]);
    }

    #[test]
    fn resolve_is_idempotent() {
        let config = SiteConfig::default();
        let resolver = resolver_for(&config);
        let inputs: [&[&str]; 3] = [
            &["frontend", "backend", "unknown-cat"],
            &["misc", "ai", "books", "data"],
            &[],
        ];
        for dirs in inputs {
            let once = resolver.resolve(dirs.iter().copied());
            let twice = resolver.resolve(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn unconfigured_lookup_falls_back() {
        let config = SiteConfig::default();
        let resolver = resolver_for(&config);
        for key in ["unknown-cat", "misc", "rust"] {
            assert_eq!(resolver.display_name(key), key.to_uppercase());
            assert_eq!(resolver.icon(key), "fa-solid fa-folder");
            assert_eq!(resolver.class_name(key), "");
            assert_eq!(resolver.rank(key), None);
        }
    }

    #[test]
    fn configured_lookup() {
        let config = SiteConfig::default();
        let backend = resolver_for(&config).category("backend");
        assert_eq!(backend.name, "Backend Development");
        assert_eq!(backend.icon, "fa-solid fa-server");
        assert_eq!(backend.class, "cat-backend");
        assert_eq!(backend.rank, Some(0));
    }

    #[test]
    fn list_content_dirs_filters_entries() {
        let tmp = TempDir::new().unwrap();
        for dir in ["backend", "frontend", ".vitepress", "public", "images", ".git", "misc"] {
            fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        fs::write(tmp.path().join("index.md"), "# Home").unwrap();
        fs::write(tmp.path().join("about.md"), "# About").unwrap();

        let dirs = list_content_dirs(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(dirs, vec!["backend", "frontend", "misc"]);
    }

    #[test]
    fn list_content_dirs_missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(list_content_dirs(&missing, &SiteConfig::default()).is_err());
    }
}
