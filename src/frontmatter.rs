//! Frontmatter extraction.
//!
//! Articles may start with a metadata block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: "EF Core 查詢效能筆記"
//! date: 2024-03-01
//! tags: [".NET", "EF Core"]
//! description: 常見的 N+1 問題與解法
//! ---
//! # Body starts here
//! ```
//!
//! The block is read as a flat list of `key: value` lines, not as YAML. Values
//! stay strings; callers interpret the few fields that need structure (dates via
//! [`parse_date`], tags via [`parse_tags`]). Parsing never fails: a file without
//! a block yields an empty mapping and a malformed line is skipped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// Flat key/value view of a frontmatter block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: BTreeMap<String, String>,
}

impl Frontmatter {
    /// Raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value for `key`, treating an empty string as absent.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Extract the frontmatter mapping from raw file text.
///
/// The first line must be exactly `---` (a UTF-8 BOM is tolerated) and the
/// block ends at the next line that is exactly `---`. Without both delimiters
/// the mapping is empty. `str::lines` drops a trailing `\r`, so CRLF files
/// behave like LF files.
pub fn parse(text: &str) -> Frontmatter {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines();

    if lines.next() != Some(DELIMITER) {
        return Frontmatter::default();
    }

    let mut block = Vec::new();
    let mut closed = false;
    for line in lines {
        if line == DELIMITER {
            closed = true;
            break;
        }
        block.push(line);
    }
    if !closed {
        return Frontmatter::default();
    }

    let mut fields = BTreeMap::new();
    for line in block {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), unquote(value.trim()).to_string());
    }

    Frontmatter { fields }
}

/// Strip one matching pair of surrounding `"` or `'` quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parse a publish date.
///
/// Accepts RFC 3339 timestamps, bare dates (`2024-03-01`) and naive date-times
/// with a `T` or space separator. Naive values are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = unquote(raw.trim());
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Parse a `tags` value into an ordered, de-duplicated list.
///
/// - `[".NET", 'C#', Git]` → `.NET`, `C#`, `Git`
/// - `["a, b", c]` → `a, b`, `c` (commas inside quotes do not split)
/// - `Rust` → `Rust` (a bare value is one tag)
/// - `["open` → `["open` (unterminated quote: kept verbatim as one tag)
pub fn parse_tags(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) else {
        return vec![unquote(raw).to_string()];
    };

    let Some(elements) = split_list(inner) else {
        return vec![raw.to_string()];
    };

    let mut tags: Vec<String> = Vec::new();
    for element in elements {
        let tag = unquote(element.trim()).trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Split a list body on commas outside quotes. `None` on an unterminated quote.
fn split_list(inner: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, ',') => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return None;
    }
    parts.push(&inner[start..]);
    Some(parts)
}
