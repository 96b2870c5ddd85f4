//! Page-level SEO metadata.
//!
//! Derives the `<head>` metadata the site renderer injects into each article
//! page: description/keywords/author, Open Graph and Twitter card tags, and a
//! schema.org `BlogPosting` JSON-LD block for dated articles.

use crate::config::SiteConfig;
use crate::index::ArticleRecord;
use crate::urls;
use maud::{PreEscaped, html};
use serde::Serialize;

/// `BlogPosting` structured data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPosting {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    #[serde(rename = "datePublished")]
    pub date_published: String,
    #[serde(rename = "dateModified", skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub author: Person,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
}

/// Head metadata for one article page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub author: String,
    pub og_type: &'static str,
    pub url: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_ld: Option<BlogPosting>,
}

impl SeoMeta {
    pub fn for_article(article: &ArticleRecord, config: &SiteConfig) -> Self {
        let site = &config.site;
        let keywords = if article.tags.is_empty() {
            site.keywords.clone()
        } else {
            article.tags.join(", ")
        };
        let image = article.image.as_deref().unwrap_or(&site.logo);

        // Only dated articles are blog postings; undated pages get plain meta.
        let json_ld = article.raw_date.as_ref().filter(|_| article.date.is_some()).map(|raw| {
            BlogPosting {
                context: "https://schema.org",
                kind: "BlogPosting",
                headline: article.title.clone(),
                date_published: raw.clone(),
                date_modified: article.lastmod.clone(),
                description: article.description.clone(),
                author: Person {
                    kind: "Person",
                    name: site.author.clone(),
                },
            }
        });

        Self {
            title: article.title.clone(),
            description: article
                .description
                .clone()
                .unwrap_or_else(|| site.summary.clone()),
            keywords,
            author: site.author.clone(),
            og_type: "article",
            url: urls::canonical_url(&site.hostname, &article.category, &article.slug),
            image: urls::absolute_url(&site.hostname, image),
            json_ld,
        }
    }
}

/// Metadata plus its rendered `<head>` fragment, as stored in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageHead {
    #[serde(flatten)]
    pub meta: SeoMeta,
    pub head: String,
}

impl PageHead {
    pub fn for_article(article: &ArticleRecord, config: &SiteConfig) -> Self {
        let meta = SeoMeta::for_article(article, config);
        let head = render_head(&meta);
        Self { meta, head }
    }
}

/// Render the head fragment.
pub fn render_head(meta: &SeoMeta) -> String {
    let json_ld = meta
        .json_ld
        .as_ref()
        .and_then(|ld| serde_json::to_string_pretty(ld).ok())
        // Keep the payload from closing its own <script> element
        .map(|json| json.replace("</", "<\\/"));

    html! {
        meta name="description" content=(meta.description);
        meta name="keywords" content=(meta.keywords);
        meta name="author" content=(meta.author);
        meta property="og:type" content=(meta.og_type);
        meta property="og:title" content=(meta.title);
        meta property="og:description" content=(meta.description);
        meta property="og:image" content=(meta.image);
        meta property="og:url" content=(meta.url);
        meta name="twitter:card" content="summary";
        meta name="twitter:title" content=(meta.title);
        meta name="twitter:description" content=(meta.description);
        meta name="twitter:image" content=(meta.image);
        @if let Some(json) = json_ld {
            script type="application/ld+json" { (PreEscaped(json)) }
        }
    }
    .into_string()
}
