//! Syndication feed assembly and serialization.
//!
//! Collects every dated article across all categories, orders them newest
//! first (stable, so ties keep discovery order) and writes:
//!
//! - `feed.xml`: RSS 2.0
//! - `feed.json`: JSON Feed 1.1 (carries the favicon, which RSS has no
//!   element for)
//!
//! Undated articles never enter the feed: a reader would otherwise show them
//! as freshly published. They still appear in navigation.
//!
//! ## XML Generation
//!
//! The RSS document is built with [maud](https://maud.lambda.xyz/), so every
//! interpolated value is escaped. Elements without content are written as
//! open/close pairs, since maud's void syntax is HTML-only.

use crate::config::SiteConfig;
use crate::index::CategoryIndex;
use crate::urls;
use chrono::{DateTime, Datelike, Utc};
use log::debug;
use maud::{Markup, PreEscaped, html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const RSS_FILE: &str = "feed.xml";
pub const JSON_FEED_FILE: &str = "feed.json";

const GENERATOR: &str = concat!("quillfeed ", env!("CARGO_PKG_VERSION"));
const RSS_DOCS: &str = "https://validator.w3.org/feed/docs/rss2.html";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("cannot write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub name: String,
    pub email: String,
    pub link: String,
}

impl Author {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            name: config.site.author.clone(),
            email: config.site.author_email.clone(),
            link: config.site.hostname.clone(),
        }
    }
}

/// One feed entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub title: String,
    /// Canonical URL; also the link.
    pub id: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub author: Author,
    pub date: DateTime<Utc>,
    /// Absolute image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Channel-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedChannel {
    pub title: String,
    pub description: String,
    pub id: String,
    pub link: String,
    pub language: String,
    pub image: String,
    pub favicon: String,
    pub copyright: String,
    pub author: Author,
    pub updated: DateTime<Utc>,
}

impl FeedChannel {
    pub fn new(config: &SiteConfig, now: DateTime<Utc>) -> Self {
        let site = &config.site;
        Self {
            title: site.title.clone(),
            description: site.summary.clone(),
            id: site.hostname.clone(),
            link: site.hostname.clone(),
            language: site.language.clone(),
            image: urls::absolute_url(&site.hostname, &site.logo),
            favicon: urls::absolute_url(&site.hostname, &site.favicon),
            copyright: site.copyright(now.year()),
            author: Author::from_config(config),
            updated: now,
        }
    }
}

/// Build the global feed: dated articles only, newest first.
pub fn assemble_feed(indexes: &[CategoryIndex], config: &SiteConfig) -> Vec<FeedItem> {
    let hostname = &config.site.hostname;
    let author = Author::from_config(config);

    let mut items: Vec<FeedItem> = indexes
        .iter()
        .flat_map(|index| index.articles.iter())
        .filter_map(|article| {
            let Some(date) = article.date else {
                debug!("{}: no date, left out of the feed", article.source_path);
                return None;
            };
            let url = urls::canonical_url(hostname, &article.category, &article.slug);
            Some(FeedItem {
                title: article.title.clone(),
                id: url.clone(),
                link: url,
                description: article.description.clone(),
                author: author.clone(),
                date,
                image: article
                    .image
                    .as_deref()
                    .map(|img| urls::absolute_url(hostname, img)),
            })
        })
        .collect();

    items.sort_by(|a, b| b.date.cmp(&a.date));
    items
}

/// MIME type for an enclosure, from the file extension.
fn image_mime(url: &str) -> &'static str {
    let ext = url
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "image/png",
    }
}

fn rss_item(item: &FeedItem) -> Markup {
    html! {
        item {
            title { (item.title) }
            link { (item.link) }
            guid isPermaLink="true" { (item.id) }
            pubDate { (item.date.to_rfc2822()) }
            @if let Some(description) = &item.description {
                description { (description) }
            }
            author { (item.author.email) " (" (item.author.name) ")" }
            @if let Some(image) = &item.image {
                enclosure url=(image) length="0" type=(image_mime(image)) {}
            }
        }
    }
}

/// Render the RSS 2.0 document.
pub fn render_rss(channel: &FeedChannel, items: &[FeedItem]) -> String {
    let doc = html! {
        (PreEscaped(XML_DECLARATION))
        rss version="2.0" {
            channel {
                title { (channel.title) }
                link { (channel.link) }
                description { (channel.description) }
                lastBuildDate { (channel.updated.to_rfc2822()) }
                docs { (RSS_DOCS) }
                generator { (GENERATOR) }
                language { (channel.language) }
                image {
                    title { (channel.title) }
                    url { (channel.image) }
                    link { (channel.link) }
                }
                copyright { (channel.copyright) }
                @for item in items {
                    (rss_item(item))
                }
            }
        }
    };
    doc.into_string()
}

/// Render the JSON Feed 1.1 document.
pub fn render_json_feed(channel: &FeedChannel, items: &[FeedItem]) -> serde_json::Value {
    let author = serde_json::json!({
        "name": channel.author.name,
        "url": channel.author.link,
    });
    let entries: Vec<serde_json::Value> = items
        .iter()
        .map(|item| {
            let mut entry = serde_json::json!({
                "id": item.id,
                "url": item.link,
                "title": item.title,
                "date_published": item.date.to_rfc3339(),
                "authors": [{ "name": item.author.name, "url": item.author.link }],
            });
            if let Some(description) = &item.description {
                entry["summary"] = description.clone().into();
                entry["content_text"] = description.clone().into();
            }
            if let Some(image) = &item.image {
                entry["image"] = image.clone().into();
            }
            entry
        })
        .collect();

    serde_json::json!({
        "version": "https://jsonfeed.org/version/1.1",
        "title": channel.title,
        "home_page_url": channel.link,
        "feed_url": urls::absolute_url(&channel.link, JSON_FEED_FILE),
        "description": channel.description,
        "icon": channel.image,
        "favicon": channel.favicon,
        "language": channel.language,
        "authors": [author],
        "items": entries,
    })
}

fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf, FeedError> {
    match fs::write(&path, contents) {
        Ok(()) => Ok(path),
        Err(source) => Err(FeedError::Write { path, source }),
    }
}

/// Write `feed.xml` and `feed.json` into `output_dir`.
///
/// Both documents are rendered before anything is written. Any IO failure is
/// returned with the offending path.
pub fn write_feed(
    output_dir: &Path,
    channel: &FeedChannel,
    items: &[FeedItem],
) -> Result<Vec<PathBuf>, FeedError> {
    let rss = render_rss(channel, items);
    let json = serde_json::to_string_pretty(&render_json_feed(channel, items))?;

    fs::create_dir_all(output_dir).map_err(|source| FeedError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    Ok(vec![
        write_file(output_dir.join(RSS_FILE), &rss)?,
        write_file(output_dir.join(JSON_FEED_FILE), &json)?,
    ])
}
