//! # Quillfeed
//!
//! Content indexing and feed generation for a markdown blog. The filesystem
//! is the data source: top-level directories under the content root are
//! categories, markdown files inside them are articles, and each article's
//! frontmatter supplies its title, date, tags and description.
//!
//! # Architecture: Scan Once, Derive Everything
//!
//! ```text
//! docs/  →  scan  →  Manifest  ─┬→  manifest.json   (nav, sidebar, rewrites, SEO)
//!                               ├→  posts.json      (article listing, tag filter)
//!                               └→  feed.xml / feed.json
//! ```
//!
//! The content root is read exactly once. Navigation, sidebars, the listing
//! and the feeds are pure functions of the resulting [`scan::Manifest`] and
//! the [`config::SiteConfig`], so they are unit-testable without touching
//! the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | Extracts the `---` delimited key/value block; date and tag parsing |
//! | [`category`] | Discovers category directories and orders them (configured first, then alphabetical) |
//! | [`index`] | Turns each article file into an `ArticleRecord`, reading files in parallel |
//! | [`nav`] | Top navigation and per-category sidebars, newest first |
//! | [`feed`] | Site-wide feed: RSS 2.0 and JSON Feed, dated articles only |
//! | [`seo`] | Per-article head metadata and `BlogPosting` JSON-LD |
//! | [`listing`] | `posts.json` entries with the "new post" flag |
//! | [`urls`] | Canonical URLs, normalization, legacy category rewrites |
//! | [`scan`] | Runs the stages once and bundles the [`scan::Manifest`] |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for each command |
//!
//! # Design Decisions
//!
//! ## Recover Per File, Fail Per Build
//!
//! Content problems are local: a file without frontmatter still gets a title
//! from its filename, an unparseable date just makes the article undated, and
//! an unreadable file is skipped with a warning. Only configuration errors and
//! failures to write output abort the build.
//!
//! ## Undated Articles Sink, They Don't Vanish
//!
//! Articles without a date sort as the Unix epoch, so they land at the bottom
//! of sidebars and the listing. The feed is the exception: an item without a
//! publish date is meaningless to a reader, so undated articles are left out.
//!
//! ## Maud for XML
//!
//! The RSS document and the SEO head are built with [Maud](https://maud.lambda.xyz/),
//! the same compile-time macro used for HTML. All interpolation is escaped, so
//! titles with `&` or `<` can never produce a malformed feed.

pub mod category;
pub mod config;
pub mod feed;
pub mod frontmatter;
pub mod index;
pub mod listing;
pub mod nav;
pub mod output;
pub mod scan;
pub mod seo;
pub mod urls;

#[cfg(test)]
pub(crate) mod test_helpers;
