//! Article listing for the site's article index and tag filter.
//!
//! Unlike the feed, the listing keeps undated articles (with the sentinel
//! date string) but drops files without a frontmatter title, which are
//! drafts or stubs as far as the index page is concerned.

use crate::index::{ArticleRecord, CategoryIndex};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Listing file written to the output directory.
pub const POSTS_FILE: &str = "posts.json";

/// Date string shown for undated articles.
pub const UNDATED: &str = "1970-01-01";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub url: String,
    pub category: String,
    pub date: String,
    pub lastmod: Option<String>,
    pub tags: Vec<String>,
    pub description: String,
    #[serde(rename = "isNew")]
    pub is_new: bool,
}

impl PostSummary {
    fn from_article(article: &ArticleRecord, new_since: DateTime<Utc>) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url(),
            category: article.category.clone(),
            // As written: converting to UTC would move +08:00 mornings a day back
            date: article
                .raw_date
                .clone()
                .unwrap_or_else(|| UNDATED.to_string()),
            lastmod: article.lastmod.clone(),
            tags: article.tags.clone(),
            description: article.description.clone().unwrap_or_default(),
            is_new: article.date.is_some_and(|d| d >= new_since),
        }
    }
}

/// Titled articles from every category, newest first.
pub fn build_listing(
    indexes: &[CategoryIndex],
    now: DateTime<Utc>,
    new_post_days: u32,
) -> Vec<PostSummary> {
    // A window reaching past the earliest representable date marks every
    // dated article as new.
    let new_since = now
        .checked_sub_signed(Duration::days(i64::from(new_post_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut articles: Vec<&ArticleRecord> = indexes
        .iter()
        .flat_map(|i| i.articles.iter())
        .filter(|a| a.has_title)
        .collect();
    articles.sort_by(|a, b| b.sort_date().cmp(&a.sort_date()));
    articles
        .into_iter()
        .map(|a| PostSummary::from_article(a, new_since))
        .collect()
}

/// Distinct tags with article counts, most used first, ties alphabetical.
pub fn tag_counts(posts: &[PostSummary]) -> Vec<(String, usize)> {
    let mut counts: std::collections::BTreeMap<&str, usize> = Default::default();
    for tag in posts.iter().flat_map(|p| p.tags.iter()) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(tag, n)| (tag.to_string(), n))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn index(key: &str, files: &[(&str, &str)]) -> CategoryIndex {
        CategoryIndex {
            key: key.to_string(),
            articles: files
                .iter()
                .map(|(name, text)| ArticleRecord::from_source(key, name, text))
                .collect(),
            skipped: Vec::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn untitled_articles_dropped() {
        let indexes = vec![index(
            "ai",
            &[
                ("titled.md", "---\ntitle: Titled\ndate: 2024-01-01\n---\n"),
                ("untitled.md", "---\ndate: 2024-02-01\n---\n"),
                ("bare.md", "no frontmatter"),
            ],
        )];
        let posts = build_listing(&indexes, now(), 7);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Titled");
        assert_eq!(posts[0].url, "/ai/titled");
    }

    #[test]
    fn undated_uses_sentinel_and_sorts_last() {
        let indexes = vec![
            index("backend", &[("undated.md", "---\ntitle: Undated\n---\n")]),
            index("frontend", &[("dated.md", "---\ntitle: Dated\ndate: 2023-03-03\n---\n")]),
        ];
        let posts = build_listing(&indexes, now(), 7);
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Dated", "Undated"]);
        assert_eq!(posts[1].date, UNDATED);
        assert_eq!(posts[1].description, "");
    }

    #[test]
    fn new_flag_within_window() {
        let indexes = vec![index(
            "data",
            &[
                ("fresh.md", "---\ntitle: Fresh\ndate: 2024-06-05\n---\n"),
                ("edge.md", "---\ntitle: Edge\ndate: 2024-06-03\n---\n"),
                ("old.md", "---\ntitle: Old\ndate: 2024-05-01\n---\n"),
            ],
        )];
        let posts = build_listing(&indexes, now(), 7);
        let flags: Vec<(&str, bool)> = posts.iter().map(|p| (p.title.as_str(), p.is_new)).collect();
        assert_eq!(flags, vec![("Fresh", true), ("Edge", true), ("Old", false)]);
    }

    #[test]
    fn date_kept_as_written() {
        let indexes = vec![index(
            "ai",
            &[
                ("tz.md", "---\ntitle: Taipei\ndate: 2024-01-08T03:00:00+08:00\n---\n"),
                ("odd.md", "---\ntitle: Odd\ndate: sometime in May\n---\n"),
            ],
        )];
        let posts = build_listing(&indexes, now(), 7);
        assert_eq!(posts[0].date, "2024-01-08T03:00:00+08:00");
        // Unparseable dates are shown as written but sort as undated
        assert_eq!(posts[1].title, "Odd");
        assert_eq!(posts[1].date, "sometime in May");
        assert!(!posts[1].is_new);
    }

    #[test]
    fn huge_window_marks_dated_posts_new() {
        let indexes = vec![index(
            "data",
            &[
                ("ancient.md", "---\ntitle: Ancient\ndate: 1999-01-01\n---\n"),
                ("undated.md", "---\ntitle: Undated\n---\n"),
            ],
        )];
        let posts = build_listing(&indexes, now(), 200_000_000);
        let flags: Vec<(&str, bool)> = posts.iter().map(|p| (p.title.as_str(), p.is_new)).collect();
        assert_eq!(flags, vec![("Ancient", true), ("Undated", false)]);
    }

    #[test]
    fn serializes_is_new_in_camel_case() {
        let indexes = vec![index("ai", &[("a.md", "---\ntitle: A\ndate: 2024-06-09\n---\n")])];
        let json = serde_json::to_value(build_listing(&indexes, now(), 7)).unwrap();
        assert_eq!(json[0]["isNew"], true);
        assert_eq!(json[0]["date"], "2024-06-09");
    }

    #[test]
    fn tag_counts_ordered() {
        let indexes = vec![index(
            "ai",
            &[
                ("a.md", "---\ntitle: A\ntags: [Rust, AI]\n---\n"),
                ("b.md", "---\ntitle: B\ntags: [AI]\n---\n"),
                ("c.md", "---\ntitle: C\ntags: [Go]\n---\n"),
            ],
        )];
        let posts = build_listing(&indexes, now(), 7);
        assert_eq!(
            tag_counts(&posts),
            vec![("AI".to_string(), 2), ("Go".to_string(), 1), ("Rust".to_string(), 1)]
        );
    }
}
