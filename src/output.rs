//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity
//! (category, article, feed item) leads with its semantic identity: positional
//! index and title. Source paths follow as indented `Source:` lines so the
//! output reads as a content inventory that can still be traced to files.
//!
//! Untitled articles have no identity beyond their filename, so the filename
//! is shown in parentheses in place of the title.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Categories
//! 001 Backend Development (3 articles)
//!     Source: backend/
//!     001 EF Core 查詢效能筆記
//!         Source: backend/ef-core-tips.md
//!         Date: 2024-03-15
//!         Tags: .NET, EF Core, Performance
//!     002 (untitled-draft.md)
//!         Date: none
//!
//! Skipped
//!     backend/broken.md: stream did not contain valid UTF-8
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Feed
//!
//! ```text
//! Feed (2 items)
//! 001 2024-05-20 Vue Composables & Reuse
//!     https://cloudywing.github.io/frontend/vue-composables
//! 002 2024-03-15 EF Core 查詢效能筆記
//!     https://cloudywing.github.io/backend/ef-core-tips
//!
//! Wrote dist/feed.xml
//! Wrote dist/feed.json
//! ```
//!
//! ## Check
//!
//! ```text
//! URL collisions
//!     /misc/Notes, /misc/notes
//!
//! Shadowed by rewrites
//!     /dotnet/old-post → /backend/old-post
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::feed::FeedItem;
use crate::index::ArticleRecord;
use crate::listing::PostSummary;
use crate::scan::Manifest;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 article`, `2 articles`. Pass the plural form for irregular words.
fn count(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format an article line: titled articles show their title, untitled ones
/// show the filename in parens.
///
/// ```text
/// 001 EF Core 查詢效能筆記     // titled
/// 002 (untitled-draft.md)      // untitled: filename IS the identity
/// ```
fn article_line(index: usize, article: &ArticleRecord) -> String {
    if article.has_title {
        format!("{} {}", format_index(index), article.title)
    } else {
        let filename = article
            .source_path
            .rsplit('/')
            .next()
            .unwrap_or(&article.source_path);
        format!("{} ({})", format_index(index), filename)
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing discovered categories and articles.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];

    for (pos, category) in manifest.categories.iter().enumerate() {
        let articles = manifest
            .index
            .iter()
            .find(|i| i.key == category.key)
            .map(|i| i.articles.as_slice())
            .unwrap_or_default();

        lines.push(format!(
            "{} {} ({})",
            format_index(pos + 1),
            category.name,
            count(articles.len(), "article", "articles")
        ));
        lines.push(format!("{}Source: {}/", indent(1), category.key));

        for (i, article) in articles.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), article_line(i + 1, article)));
            if article.has_title {
                lines.push(format!("{}Source: {}", indent(2), article.source_path));
            }
            let date = match (&article.date, &article.raw_date) {
                (Some(d), _) => d.format("%Y-%m-%d").to_string(),
                (None, Some(raw)) => format!("unrecognised ({raw})"),
                (None, None) => "none".to_string(),
            };
            lines.push(format!("{}Date: {}", indent(2), date));
            if !article.tags.is_empty() {
                lines.push(format!("{}Tags: {}", indent(2), article.tags.join(", ")));
            }
            if let Some(desc) = &article.description {
                lines.push(format!("{}{}", indent(2), truncate_desc(desc.trim(), 60)));
            }
        }
    }

    let skipped: Vec<_> = manifest.skipped().collect();
    if !skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skip in skipped {
            let path = skip.path.strip_prefix(source_root).unwrap_or(&skip.path);
            lines.push(format!("{}{}: {}", indent(1), path.display(), skip.reason));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join(crate::config::CONFIG_FILE).exists() {
        lines.push(format!("{}{}", indent(1), crate::config::CONFIG_FILE));
    } else {
        lines.push(format!("{}(stock defaults)", indent(1)));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Feed output
// ============================================================================

/// Format the feed item list and the files written.
pub fn format_feed_output(items: &[FeedItem], written: &[PathBuf]) -> Vec<String> {
    let mut lines = vec![format!("Feed ({})", count(items.len(), "item", "items"))];
    for (i, item) in items.iter().enumerate() {
        lines.push(format!(
            "{} {} {}",
            format_index(i + 1),
            item.date.format("%Y-%m-%d"),
            item.title
        ));
        lines.push(format!("{}{}", indent(1), item.link));
    }
    if !written.is_empty() {
        lines.push(String::new());
        for path in written {
            lines.push(format!("Wrote {}", path.display()));
        }
    }
    lines
}

/// Print feed output to stdout.
pub fn print_feed_output(items: &[FeedItem], written: &[PathBuf]) {
    for line in format_feed_output(items, written) {
        println!("{}", line);
    }
}

// ============================================================================
// Build summary
// ============================================================================

/// One-line totals for a full build, plus the most used tags.
pub fn format_build_summary(
    manifest: &Manifest,
    feed_items: usize,
    posts: &[PostSummary],
) -> Vec<String> {
    let mut lines = vec![format!(
        "Built {}, {}, {}, {}",
        count(manifest.categories.len(), "category", "categories"),
        count(manifest.article_count(), "article", "articles"),
        count(feed_items, "feed item", "feed items"),
        count(posts.len(), "listed post", "listed posts"),
    )];

    let new_posts = posts.iter().filter(|p| p.is_new).count();
    if new_posts > 0 {
        lines.push(format!("{}{} new", indent(1), new_posts));
    }

    let tags = crate::listing::tag_counts(posts);
    if !tags.is_empty() {
        let top: Vec<String> = tags
            .iter()
            .take(5)
            .map(|(tag, n)| format!("{tag} ({n})"))
            .collect();
        lines.push(format!("{}Top tags: {}", indent(1), top.join(", ")));
    }
    lines
}

/// Print the build summary to stdout.
pub fn print_build_summary(manifest: &Manifest, feed_items: usize, posts: &[PostSummary]) {
    for line in format_build_summary(manifest, feed_items, posts) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format URL problems. An empty problem set yields a single all-clear line.
pub fn format_check_output(collisions: &[Vec<String>], shadowed: &[(String, String)]) -> Vec<String> {
    if collisions.is_empty() && shadowed.is_empty() {
        return vec!["No URL problems found".to_string()];
    }

    let mut lines = Vec::new();
    if !collisions.is_empty() {
        lines.push("URL collisions".to_string());
        for group in collisions {
            lines.push(format!("{}{}", indent(1), group.join(", ")));
        }
    }
    if !shadowed.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Shadowed by rewrites".to_string());
        for (from, to) in shadowed {
            lines.push(format!("{}{} → {}", indent(1), from, to));
        }
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(collisions: &[Vec<String>], shadowed: &[(String, String)]) {
    for line in format_check_output(collisions, shadowed) {
        println!("{}", line);
    }
}
