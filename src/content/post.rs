//! Post and Category models

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::cmp::Reverse;
use std::path::PathBuf;

use super::frontmatter::PostMeta;

/// A blog post
#[derive(Debug, Clone)]
pub struct Post {
    /// Output file name (source stem + `.html`)
    pub filename: String,

    /// Full source file path
    pub source: PathBuf,

    /// Validated front-matter
    pub meta: PostMeta,

    /// Rendered HTML body
    pub content: String,
}

impl Post {
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn date(&self) -> &str {
        &self.meta.date
    }

    pub fn category(&self) -> &str {
        &self.meta.category
    }

    /// Entry used on the index page
    pub fn entry(&self) -> PostEntry {
        PostEntry {
            filename: self.filename.clone(),
            title: self.meta.title.clone(),
            date: self.meta.date.clone(),
            category: self.meta.category.clone(),
        }
    }

    /// Entry used on category pages
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            filename: self.filename.clone(),
            title: self.meta.title.clone(),
            date: self.meta.date.clone(),
        }
    }
}

/// Index listing entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostEntry {
    pub filename: String,
    pub title: String,
    pub date: String,
    pub category: String,
}

/// Category listing entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub filename: String,
    pub title: String,
    pub date: String,
}

/// A category with the posts filed under it, in encounter order
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub name: String,
    pub posts: Vec<PostSummary>,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            posts: Vec::new(),
        }
    }

    /// File name of the category listing page
    pub fn file_name(&self) -> String {
        category_file_name(&self.name)
    }
}

/// Listing page file name for a category; path separators become `-`
pub fn category_file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!("{}.html", safe)
}

/// Anything that carries a front-matter date
pub trait Dated {
    fn date(&self) -> &str;
}

impl Dated for PostEntry {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for PostSummary {
    fn date(&self) -> &str {
        &self.date
    }
}

/// Stable sort, newest first.
///
/// Dates that parse compare as date-times and sort above dates that don't;
/// those fall back to plain string order. Equal keys keep their input order.
pub fn sort_by_date_desc<T: Dated>(items: &mut [T]) {
    items.sort_by_cached_key(|item| Reverse(DateKey::new(item.date())));
}

/// Sort key for a front-matter date; `Raw` orders below every `Parsed`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum DateKey {
    Raw(String),
    Parsed(NaiveDateTime),
}

impl DateKey {
    fn new(raw: &str) -> Self {
        match parse_date_string(raw) {
            Some(dt) => DateKey::Parsed(dt),
            None => DateKey::Raw(raw.to_string()),
        }
    }
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset, compared in UTC
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}
