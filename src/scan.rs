//! Content scanning and manifest generation.
//!
//! Stage 1 of the build. Reads the content root once and produces the
//! [`Manifest`] every later step works from: ordered categories, per-category
//! article indexes, navigation, sidebars and per-article SEO metadata.
//!
//! ## Directory Structure
//!
//! ```text
//! docs/                            # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── index.md                     # Home page (not in any category)
//! ├── .vitepress/                  # Ignored
//! ├── public/                      # Ignored
//! ├── backend/                     # Category (configured, rank 0)
//! │   ├── index.md                 # Category landing page, not an article
//! │   ├── ef-core-tips.md
//! │   └── linq-pitfalls.md
//! ├── frontend/                    # Category (configured, rank 1)
//! │   └── vue-composables.md
//! └── misc/                        # Unconfigured: sorts last, shown as "MISC"
//!     └── reading-list.md
//! ```
//!
//! ## Output
//!
//! The manifest is serialized to `manifest.json` for the site renderer. The
//! feed and the article listing are derived from it without touching the
//! filesystem again.

use crate::category::{self, Category, CategoryResolver};
use crate::config::{self, Rewrite, SiteConfig};
use crate::index::{self, CategoryIndex, SkippedFile};
use crate::nav::{self, NavLink, SidebarSection};
use crate::seo::PageHead;
use crate::urls;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read content root {path:?}: {source}")]
    ContentRoot {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub categories: Vec<Category>,
    pub navigation: Vec<NavLink>,
    pub sidebar: BTreeMap<String, Vec<SidebarSection>>,
    pub rewrites: Vec<Rewrite>,
    pub index: Vec<CategoryIndex>,
    /// Head metadata and rendered head fragment, keyed by site-relative
    /// article URL.
    pub seo: BTreeMap<String, PageHead>,
    pub config: SiteConfig,
}

impl Manifest {
    /// Total number of indexed articles.
    pub fn article_count(&self) -> usize {
        self.index.iter().map(|i| i.articles.len()).sum()
    }

    /// Files left out of the index across all categories.
    pub fn skipped(&self) -> impl Iterator<Item = &SkippedFile> {
        self.index.iter().flat_map(|i| i.skipped.iter())
    }

    /// Article URLs that collide once normalized.
    pub fn url_collisions(&self) -> Vec<Vec<String>> {
        let urls: Vec<String> = self
            .index
            .iter()
            .flat_map(|i| i.articles.iter().map(|a| a.url()))
            .collect();
        urls::find_collisions(urls.iter().map(String::as_str))
    }

    /// Articles living under a legacy category prefix, paired with the URL the
    /// rewrite table redirects them to. The site never serves these.
    pub fn shadowed_articles(&self) -> Vec<(String, String)> {
        self.index
            .iter()
            .flat_map(|i| i.articles.iter())
            .filter_map(|a| {
                let url = a.url();
                urls::apply_rewrites(&url, &self.rewrites).map(|target| (url, target))
            })
            .collect()
    }
}

/// Scan the content root, loading `config.toml` from it.
pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    scan_with_config(root, config)
}

/// Scan the content root with an explicit configuration.
pub fn scan_with_config(root: &Path, config: SiteConfig) -> Result<Manifest, ScanError> {
    let dirs =
        category::list_content_dirs(root, &config).map_err(|source| ScanError::ContentRoot {
            path: root.to_path_buf(),
            source,
        })?;

    let resolver = CategoryResolver::new(&config);
    let keys = resolver.resolve(dirs);
    let index = index::index_all(root, &keys);

    let categories = keys.iter().map(|k| resolver.category(k)).collect();
    let navigation = nav::build_nav(&keys, &resolver);
    let sidebar = nav::build_sidebars(&index, &resolver);
    let seo = index
        .iter()
        .flat_map(|i| i.articles.iter())
        .map(|a| (a.url(), PageHead::for_article(a, &config)))
        .collect();

    let manifest = Manifest {
        categories,
        navigation,
        sidebar,
        rewrites: config.rewrites.clone(),
        index,
        seo,
        config,
    };
    info!(
        "scanned {} categories, {} articles",
        manifest.categories.len(),
        manifest.article_count()
    );
    Ok(manifest)
}
