//! Content indexing.
//!
//! Walks one category directory and turns every article file into an
//! [`ArticleRecord`]. Only `.md` files are articles, and `index.md` is the
//! category landing page rather than an article.
//!
//! ## Field resolution
//!
//! | Field | Source | Fallback |
//! |-------|--------|----------|
//! | title | `title` | filename without extension |
//! | date | `date` | none (sorts as [`sentinel_date`]) |
//! | tags | `tags` | empty |
//! | description, image, lastmod | same-named key | none |
//!
//! Empty values count as missing. A file that cannot be read is logged,
//! recorded in [`CategoryIndex::skipped`] and left out; the rest of the
//! category is still indexed.

use crate::frontmatter::{self, Frontmatter};
use crate::urls;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Category landing page, excluded from article listings.
pub const INDEX_FILE: &str = "index.md";

const MARKDOWN_EXTENSION: &str = "md";

/// Sort date for articles without a publish date: they sink below every
/// dated article.
pub fn sentinel_date() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// One article file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    pub category: String,
    /// Filename without extension; the last URL segment.
    pub slug: String,
    /// Path relative to the content root, e.g. `backend/ef-core.md`.
    pub source_path: String,
    /// Frontmatter title, or the slug.
    pub title: String,
    /// Whether `title` came from frontmatter.
    pub has_title: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// The `date` value as written, kept for structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Root-relative image path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ArticleRecord {
    /// Build a record from a file's name and text.
    pub fn from_source(category: &str, file_name: &str, text: &str) -> Self {
        let fm = frontmatter::parse(text);
        if fm.is_empty() {
            debug!("{category}/{file_name}: no frontmatter, using filename as title");
        }
        Self::from_frontmatter(category, file_name, &fm)
    }

    pub fn from_frontmatter(category: &str, file_name: &str, fm: &Frontmatter) -> Self {
        let slug = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_string());
        let source_path = format!("{category}/{file_name}");

        let title = fm.non_empty("title").map(str::to_string);
        let raw_date = fm.non_empty("date").map(str::to_string);
        let date = raw_date.as_deref().and_then(frontmatter::parse_date);
        if let (Some(raw), None) = (&raw_date, &date) {
            warn!("{source_path}: unrecognised date {raw:?}, treating article as undated");
        }

        Self {
            category: category.to_string(),
            has_title: title.is_some(),
            title: title.unwrap_or_else(|| slug.clone()),
            slug,
            source_path,
            date,
            raw_date,
            lastmod: fm.non_empty("lastmod").map(str::to_string),
            tags: fm
                .get("tags")
                .map(frontmatter::parse_tags)
                .unwrap_or_default(),
            description: fm.non_empty("description").map(str::to_string),
            image: fm.non_empty("image").map(str::to_string),
        }
    }

    /// Site-relative URL, `/{category}/{slug}`.
    pub fn url(&self) -> String {
        urls::article_path(&self.category, &self.slug)
    }

    /// Publish date, or the sentinel for undated articles.
    pub fn sort_date(&self) -> DateTime<Utc> {
        self.date.unwrap_or_else(sentinel_date)
    }
}

/// A file left out of the index, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// All articles of one category, in discovery (filename) order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryIndex {
    pub key: String,
    pub articles: Vec<ArticleRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

/// Whether a path is an article: a markdown file other than the landing page.
///
/// Both the extension and the landing page name compare case-insensitively,
/// so `POST.MD` is an article and `INDEX.md` is not.
pub fn is_article_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let is_markdown = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
        .unwrap_or(false);
    let is_index = path
        .file_name()
        .map(|n| n.eq_ignore_ascii_case(INDEX_FILE))
        .unwrap_or(false);
    is_markdown && !is_index
}

/// Index one category directory.
///
/// Files are read in parallel; results keep filename order.
pub fn index_category(root: &Path, key: &str) -> CategoryIndex {
    let dir = root.join(key);
    let files = match collect_article_files(&dir) {
        Ok(files) => files,
        Err(e) => {
            warn!("{}: cannot list category directory: {e}", dir.display());
            return CategoryIndex {
                key: key.to_string(),
                articles: Vec::new(),
                skipped: vec![SkippedFile {
                    path: dir,
                    reason: e.to_string(),
                }],
            };
        }
    };

    let results: Vec<Result<ArticleRecord, SkippedFile>> = files
        .par_iter()
        .map(|path| read_article(key, path))
        .collect();

    let mut articles = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for result in results {
        match result {
            Ok(article) => articles.push(article),
            Err(skip) => skipped.push(skip),
        }
    }
    let (articles, duplicates) = drop_duplicate_slugs(&dir, articles);
    skipped.extend(duplicates);

    CategoryIndex {
        key: key.to_string(),
        articles,
        skipped,
    }
}

/// Index every category, keeping the given category order.
pub fn index_all<S: AsRef<str>>(root: &Path, keys: &[S]) -> Vec<CategoryIndex> {
    keys.iter()
        .map(|key| index_category(root, key.as_ref()))
        .collect()
}

/// Keep the first article for each slug; later ones would share its URL.
///
/// Input is in filename order, so `post.MD` wins over `post.md`.
fn drop_duplicate_slugs(
    dir: &Path,
    articles: Vec<ArticleRecord>,
) -> (Vec<ArticleRecord>, Vec<SkippedFile>) {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut kept = Vec::with_capacity(articles.len());
    let mut skipped = Vec::new();
    for article in articles {
        if let Some(first) = seen.get(&article.slug) {
            warn!(
                "{}: skipped, URL {} already used by {first}",
                article.source_path,
                article.url()
            );
            let file_name = article.source_path.rsplit('/').next().unwrap_or_default();
            skipped.push(SkippedFile {
                path: dir.join(file_name),
                reason: format!("duplicate URL {} (kept {first})", article.url()),
            });
            continue;
        }
        seen.insert(article.slug.clone(), article.source_path.clone());
        kept.push(article);
    }
    (kept, skipped)
}

fn collect_article_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_article_file(p))
        .collect();
    files.sort();
    Ok(files)
}

fn read_article(category: &str, path: &Path) -> Result<ArticleRecord, SkippedFile> {
    let text = fs::read_to_string(path).map_err(|e| {
        warn!("{}: skipped, cannot read: {e}", path.display());
        SkippedFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(ArticleRecord::from_source(category, &file_name, &text))
}
