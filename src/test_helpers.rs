//! Shared test utilities for the quillfeed test suite.
//!
//! Provides fixture setup, lookup helpers and navigation assertions that work
//! with scan-phase data structures (`Manifest`, `CategoryIndex`,
//! `ArticleRecord`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let backend = find_index(&manifest, "backend");
//! let article = find_article(backend, "ef-core-tips");
//! assert_eq!(article.title, "EF Core 查詢效能筆記");
//!
//! assert_nav_texts(&manifest, &["Backend Development", "MISC"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::index::{ArticleRecord, CategoryIndex};
use crate::scan::Manifest;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a category index by key. Panics if not found.
pub fn find_index<'a>(manifest: &'a Manifest, key: &str) -> &'a CategoryIndex {
    manifest
        .index
        .iter()
        .find(|i| i.key == key)
        .unwrap_or_else(|| {
            let keys: Vec<&str> = manifest.index.iter().map(|i| i.key.as_str()).collect();
            panic!("category '{key}' not found. Available: {keys:?}")
        })
}

/// Find an article by slug within a category. Panics if not found.
pub fn find_article<'a>(index: &'a CategoryIndex, slug: &str) -> &'a ArticleRecord {
    index
        .articles
        .iter()
        .find(|a| a.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = index.articles.iter().map(|a| a.slug.as_str()).collect();
            panic!(
                "article '{slug}' not found in category '{}'. Available: {slugs:?}",
                index.key
            )
        })
}

// =========================================================================
// Navigation helpers
// =========================================================================

/// Top-level navigation texts in order.
pub fn nav_texts(manifest: &Manifest) -> Vec<&str> {
    manifest
        .navigation
        .iter()
        .map(|n| n.text.as_str())
        .collect()
}

/// Sidebar entry texts for a category. Panics if the category has no sidebar.
pub fn sidebar_titles<'a>(manifest: &'a Manifest, key: &str) -> Vec<&'a str> {
    let base = format!("/{key}/");
    manifest
        .sidebar
        .get(&base)
        .map(|sections| {
            sections
                .iter()
                .flat_map(|s| s.items.iter().map(|i| i.text.as_str()))
                .collect()
        })
        .unwrap_or_else(|| {
            let keys: Vec<&String> = manifest.sidebar.keys().collect();
            panic!("sidebar '{base}' not found. Available: {keys:?}")
        })
}

/// Assert the navigation lists exactly these texts, in order.
pub fn assert_nav_texts(manifest: &Manifest, expected: &[&str]) {
    assert_eq!(nav_texts(manifest), expected.to_vec(), "nav texts mismatch");
}
