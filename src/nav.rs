//! Navigation and sidebar derivation.
//!
//! The navigation lists categories in resolved order. Each category with at
//! least one article gets a sidebar section headed by its display name, with
//! articles newest first. Undated articles sort as the sentinel date and so
//! land at the bottom; the sort is stable, so ties keep filename order.

use crate::category::CategoryResolver;
use crate::index::CategoryIndex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Top-level navigation entry for a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub text: String,
    pub link: String,
    /// Path prefix that marks the entry active.
    pub active_match: String,
}

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarLink {
    pub text: String,
    pub link: String,
}

/// A category's sidebar group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarSection {
    pub text: String,
    pub items: Vec<SidebarLink>,
}

fn category_base(key: &str) -> String {
    format!("/{key}/")
}

/// Navigation entries for already-ordered category keys.
pub fn build_nav<S: AsRef<str>>(keys: &[S], resolver: &CategoryResolver) -> Vec<NavLink> {
    keys.iter()
        .map(|key| {
            let key = key.as_ref();
            NavLink {
                text: resolver.display_name(key),
                link: category_base(key),
                active_match: category_base(key),
            }
        })
        .collect()
}

/// Sidebar section for one category; `None` when it has no articles.
pub fn build_sidebar(index: &CategoryIndex, resolver: &CategoryResolver) -> Option<SidebarSection> {
    if index.articles.is_empty() {
        return None;
    }
    let mut articles: Vec<_> = index.articles.iter().collect();
    articles.sort_by(|a, b| b.sort_date().cmp(&a.sort_date()));

    Some(SidebarSection {
        text: resolver.display_name(&index.key),
        items: articles
            .into_iter()
            .map(|a| SidebarLink {
                text: a.title.clone(),
                link: a.url(),
            })
            .collect(),
    })
}

/// Sidebars keyed by category base path (`/backend/`).
pub fn build_sidebars(
    indexes: &[CategoryIndex],
    resolver: &CategoryResolver,
) -> BTreeMap<String, Vec<SidebarSection>> {
    indexes
        .iter()
        .filter_map(|index| {
            build_sidebar(index, resolver).map(|section| (category_base(&index.key), vec![section]))
        })
        .collect()
}
