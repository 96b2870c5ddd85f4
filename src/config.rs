//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The configuration is
//! a single immutable value loaded once at build start and passed explicitly to
//! every stage. Stock defaults describe the blog as it ships; a `config.toml`
//! in the content root overrides any subset of them.
//!
//! ## Config File Location
//!
//! ```text
//! docs/
//! ├── config.toml              # Optional, overrides stock defaults
//! ├── backend/
//! │   ├── index.md             # Category landing page (not an article)
//! │   └── ef-core-tips.md
//! └── frontend/
//!     └── ...
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Tables merge key by key; arrays (such as
//! `[[categories]]`) replace the stock array wholesale:
//!
//! ```toml
//! [site]
//! hostname = "https://blog.example.org"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file name, looked up in the content root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide constants used by the feed and SEO metadata.
    pub site: SiteInfo,
    /// Content-root directories that are never categories.
    pub ignore_dirs: Vec<String>,
    /// Configured categories. List order is the preferred navigation order.
    pub categories: Vec<CategoryConfig>,
    /// Icon and style used for directories missing from `categories`.
    pub category_fallback: CategoryFallback,
    /// Legacy category prefixes and the current category they map to.
    pub rewrites: Vec<Rewrite>,
    /// Article listing settings.
    pub listing: ListingConfig,
    /// Parallel file reading settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteInfo::default(),
            ignore_dirs: vec![
                ".vitepress".to_string(),
                "public".to_string(),
                "images".to_string(),
            ],
            categories: default_categories(),
            category_fallback: CategoryFallback::default(),
            rewrites: vec![
                Rewrite::new("dotnet", "backend"),
                Rewrite::new("database", "data"),
                Rewrite::new("git", "devops"),
            ],
            listing: ListingConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hostname = &self.site.hostname;
        if !(hostname.starts_with("http://") || hostname.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "site.hostname must start with http:// or https:// (got {hostname:?})"
            )));
        }
        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.key.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "categories[].key must not be empty".into(),
                ));
            }
            if !seen.insert(category.key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate category key {:?}",
                    category.key
                )));
            }
        }
        for rewrite in &self.rewrites {
            if rewrite.from.is_empty() || rewrite.to.is_empty() {
                return Err(ConfigError::Validation(
                    "rewrites[] entries need both `from` and `to`".into(),
                ));
            }
        }
        if self.listing.new_post_days == 0 {
            return Err(ConfigError::Validation(
                "listing.new_post_days must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Look up a configured category by directory name.
    pub fn category(&self, key: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Whether a content-root entry is excluded from category discovery.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_dirs.iter().any(|d| d == name)
    }
}

/// Site-wide constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    /// Short title shown in the navigation bar.
    pub nav_title: String,
    /// One-line site summary, used as feed and fallback page description.
    pub summary: String,
    /// Absolute site origin, e.g. `https://cloudywing.github.io`.
    pub hostname: String,
    /// Root-relative logo path.
    pub logo: String,
    /// Root-relative favicon path.
    pub favicon: String,
    pub repo: String,
    pub author: String,
    pub author_email: String,
    /// Comma-separated site keywords, used when an article has no tags.
    pub keywords: String,
    pub language: String,
    /// First year in the copyright notice.
    pub copyright_start_year: i32,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "CloudyWing's Log".to_string(),
            nav_title: "雲翼的技術隨筆".to_string(),
            summary: "開發筆記、踩坑紀錄與架構思考".to_string(),
            hostname: "https://cloudywing.github.io".to_string(),
            logo: "/images/logo.png".to_string(),
            favicon: "/favicon.ico".to_string(),
            repo: "https://github.com/CloudyWing/cloudywing.github.io".to_string(),
            author: "Wing Chou (CloudyWing)".to_string(),
            author_email: "cloudywing@example.com".to_string(),
            keywords: ".NET, C#, ASP.NET Core, Database, SQL Server, AI, DevOps, Git, Frontend, 技術筆記"
                .to_string(),
            language: "zh-TW".to_string(),
            copyright_start_year: 2022,
        }
    }
}

impl SiteInfo {
    /// Copyright notice with a year range ending at `current_year`.
    ///
    /// Collapses to a single year when the start year is not in the past.
    pub fn copyright(&self, current_year: i32) -> String {
        let start = self.copyright_start_year;
        let range = if start >= current_year {
            start.to_string()
        } else {
            format!("{start}-{current_year}")
        };
        format!("Copyright © {range} {}. All Rights Reserved.", self.author)
    }
}

/// Display metadata for one category directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    /// Directory name under the content root.
    pub key: String,
    /// Display name in navigation and sidebar headings.
    pub name: String,
    /// Icon token (Font Awesome classes).
    pub icon: String,
    /// CSS class applied to category badges.
    pub class: String,
}

impl CategoryConfig {
    fn new(key: &str, name: &str, icon: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            class: format!("cat-{key}"),
        }
    }
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new("backend", "Backend Development", "fa-solid fa-server"),
        CategoryConfig::new("frontend", "Frontend Development", "fa-solid fa-laptop-code"),
        CategoryConfig::new("data", "Data & Database", "fa-solid fa-database"),
        CategoryConfig::new("devops", "DevOps & Infrastructure", "fa-solid fa-cubes"),
        CategoryConfig::new("ai", "AI & Machine Learning", "fa-solid fa-robot"),
    ]
}

/// Icon and style for categories without a configuration entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryFallback {
    pub icon: String,
    pub class: String,
}

impl Default for CategoryFallback {
    fn default() -> Self {
        Self {
            icon: "fa-solid fa-folder".to_string(),
            class: String::new(),
        }
    }
}

/// Legacy category prefix mapped to its current category key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rewrite {
    pub from: String,
    pub to: String,
}

impl Rewrite {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Article listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Articles published within this many days carry the "new" flag.
    pub new_post_days: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { new_post_days: 7 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel file readers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values, arrays included, replace base values entirely.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# quillfeed configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Place this file at the content root (next to the category directories).
# Unknown keys cause an error.

# Content-root directories that are never treated as categories.
ignore_dirs = [".vitepress", "public", "images"]

# ---------------------------------------------------------------------------
# Site constants (feed channel, SEO metadata)
# ---------------------------------------------------------------------------
[site]
title = "CloudyWing's Log"
nav_title = "雲翼的技術隨筆"
summary = "開發筆記、踩坑紀錄與架構思考"
hostname = "https://cloudywing.github.io"
logo = "/images/logo.png"
favicon = "/favicon.ico"
repo = "https://github.com/CloudyWing/cloudywing.github.io"
author = "Wing Chou (CloudyWing)"
author_email = "cloudywing@example.com"
keywords = ".NET, C#, ASP.NET Core, Database, SQL Server, AI, DevOps, Git, Frontend, 技術筆記"
language = "zh-TW"
# First year of the copyright range; the last year is the build year.
copyright_start_year = 2022

# ---------------------------------------------------------------------------
# Categories, in navigation order. Directories not listed here still work:
# they sort alphabetically after these, display as the uppercased directory
# name and use [category_fallback].
# ---------------------------------------------------------------------------
[[categories]]
key = "backend"
name = "Backend Development"
icon = "fa-solid fa-server"
class = "cat-backend"

[[categories]]
key = "frontend"
name = "Frontend Development"
icon = "fa-solid fa-laptop-code"
class = "cat-frontend"

[[categories]]
key = "data"
name = "Data & Database"
icon = "fa-solid fa-database"
class = "cat-data"

[[categories]]
key = "devops"
name = "DevOps & Infrastructure"
icon = "fa-solid fa-cubes"
class = "cat-devops"

[[categories]]
key = "ai"
name = "AI & Machine Learning"
icon = "fa-solid fa-robot"
class = "cat-ai"

[category_fallback]
icon = "fa-solid fa-folder"
class = ""

# ---------------------------------------------------------------------------
# Legacy category paths, rewritten by the site renderer.
# ---------------------------------------------------------------------------
[[rewrites]]
from = "dotnet"
to = "backend"

[[rewrites]]
from = "database"
to = "data"

[[rewrites]]
from = "git"
to = "devops"

# ---------------------------------------------------------------------------
# Article listing (posts.json)
# ---------------------------------------------------------------------------
[listing]
# Articles published within this many days are flagged as new.
new_post_days = 7

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel file readers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_site_constants() {
        let config = SiteConfig::default();
        assert_eq!(config.site.hostname, "https://cloudywing.github.io");
        assert_eq!(config.site.language, "zh-TW");
        assert_eq!(config.site.copyright_start_year, 2022);
    }

    #[test]
    fn default_category_order() {
        let config = SiteConfig::default();
        let keys: Vec<&str> = config.categories.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["backend", "frontend", "data", "devops", "ai"]);
        assert_eq!(config.category("data").unwrap().class, "cat-data");
    }

    #[test]
    fn default_ignore_dirs() {
        let config = SiteConfig::default();
        assert!(config.is_ignored(".vitepress"));
        assert!(config.is_ignored("public"));
        assert!(config.is_ignored("images"));
        assert!(!config.is_ignored("backend"));
    }

    #[test]
    fn copyright_range() {
        let site = SiteInfo::default();
        assert_eq!(
            site.copyright(2026),
            "Copyright © 2022-2026 Wing Chou (CloudyWing). All Rights Reserved."
        );
    }

    #[test]
    fn copyright_single_year() {
        let site = SiteInfo {
            copyright_start_year: 2026,
            ..SiteInfo::default()
        };
        assert_eq!(
            site.copyright(2026),
            "Copyright © 2026 Wing Chou (CloudyWing). All Rights Reserved."
        );
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[site]
hostname = "https://blog.example.org"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.hostname, "https://blog.example.org");
        assert_eq!(config.site.author, "Wing Chou (CloudyWing)");
        assert_eq!(config.categories.len(), 5);
    }

    #[test]
    fn stock_config_matches_defaults() {
        let from_text: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(from_text.categories, defaults.categories);
        assert_eq!(from_text.rewrites, defaults.rewrites);
        assert_eq!(from_text.ignore_dirs, defaults.ignore_dirs);
        assert_eq!(from_text.site.keywords, defaults.site.keywords);
        assert_eq!(from_text.listing.new_post_days, 7);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "CloudyWing's Log");
        assert_eq!(config.categories.len(), 5);
    }

    #[test]
    fn load_config_categories_replace_stock_list() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[[categories]]
key = "rust"
name = "Rust"
icon = "fa-brands fa-rust"
class = "cat-rust"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories[0].key, "rust");
        // Untouched sections keep their defaults
        assert_eq!(config.rewrites.len(), 3);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[site\ntitle = ").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[site]\ntitel = \"typo\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[theme]\ncolor = \"red\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[site]
title = "a"
author = "b"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[site]\ntitle = \"c\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        let site = merged.get("site").unwrap();
        assert_eq!(site.get("title").unwrap().as_str(), Some("c"));
        assert_eq!(site.get("author").unwrap().as_str(), Some("b"));
    }

    #[test]
    fn merge_toml_array_replaces() {
        let base: toml::Value = toml::from_str("ignore_dirs = [\"a\", \"b\"]\n").unwrap();
        let overlay: toml::Value = toml::from_str("ignore_dirs = [\"c\"]\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(
            merged.get("ignore_dirs").unwrap().as_array().unwrap().len(),
            1
        );
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_hostname_scheme() {
        let mut config = SiteConfig::default();
        config.site.hostname = "cloudywing.github.io".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_duplicate_category_key() {
        let mut config = SiteConfig::default();
        config.categories.push(config.categories[0].clone());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backend"));
    }

    #[test]
    fn validate_new_post_days_zero() {
        let mut config = SiteConfig::default();
        config.listing.new_post_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }
}
