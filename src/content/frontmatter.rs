//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_yaml::Value;
use std::path::Path;
use thiserror::Error;

use crate::error::{BlogError, Result};

/// Line that opens and closes the metadata block
pub const MARKER: &str = "---";

/// Why a post's front-matter block could not be read
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("file does not start with a `---` front-matter marker")]
    MissingOpening,

    #[error("front-matter block is never closed by a second `---` marker")]
    Unterminated,

    #[error("front-matter is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front-matter must be a key/value mapping")]
    NotAMapping,

    #[error("front-matter key {0:?} is not a string")]
    NonStringKey(Value),
}

/// Front-matter data from a post, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub fields: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> std::result::Result<(Self, &str), FrontMatterError> {
        let (yaml, body) = split(content)?;

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let mapping = match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok((FrontMatter::default(), body)),
            _ => return Err(FrontMatterError::NotAMapping),
        };

        let mut fields = IndexMap::with_capacity(mapping.len());
        for (key, value) in mapping {
            match key {
                Value::String(key) => {
                    fields.insert(key, value);
                }
                other => return Err(FrontMatterError::NonStringKey(other)),
            }
        }

        Ok((FrontMatter { fields }, body))
    }

    /// Look up a scalar field as a string
    ///
    /// Numbers and booleans are stringified, so an unquoted `date: 2024` still
    /// reads as `"2024"`. Null, sequences and mappings yield `None`.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// `draft: true` keeps a post out of the generated site
    pub fn is_draft(&self) -> bool {
        matches!(self.fields.get("draft"), Some(Value::Bool(true)))
    }

    /// Validate the required keys, producing the typed post metadata
    pub fn into_meta(mut self, path: &Path) -> Result<PostMeta> {
        let title = self.required(path, "title")?;
        let date = self.required(path, "date")?;
        let category = normalize_category(&self.required(path, "category")?);
        if category.is_empty() {
            return Err(BlogError::MissingField {
                path: path.to_path_buf(),
                field: "category",
            });
        }

        for key in ["title", "date", "category"] {
            self.fields.shift_remove(key);
        }

        Ok(PostMeta {
            title,
            date,
            category,
            extra: self.fields,
        })
    }

    fn required(&self, path: &Path, field: &'static str) -> Result<String> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Err(BlogError::MissingField {
                path: path.to_path_buf(),
                field,
            }),
            Some(_) => self.get_str(field).ok_or_else(|| BlogError::MalformedPost {
                path: path.to_path_buf(),
                reason: format!("field `{}` must be a scalar value", field),
            }),
        }
    }
}

/// Validated metadata of one post
///
/// Serializes as a flat mapping, so templates see `metadata.title`,
/// `metadata.date`, `metadata.category` and any extra keys side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct PostMeta {
    pub title: String,
    pub date: String,
    /// Normalized category name
    pub category: String,
    /// Any other front-matter keys, passed through to templates
    pub extra: IndexMap<String, Value>,
}

impl Serialize for PostMeta {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.extra.len() + 3))?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("date", &self.date)?;
        map.serialize_entry("category", &self.category)?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Trim a category and upper-case its first character
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split raw text into (yaml block, body) on the first two marker lines.
///
/// Only blank lines may precede the opening marker. Marker lines further down
/// the body are left alone.
fn split(content: &str) -> std::result::Result<(&str, &str), FrontMatterError> {
    let content = content.trim_start_matches('\u{feff}');
    let mut offset = 0;
    let mut yaml_start = None;

    for line in content.split_inclusive('\n') {
        let end = offset + line.len();
        let is_marker = line.trim_end() == MARKER;

        match yaml_start {
            None if is_marker => yaml_start = Some(end),
            None if !line.trim().is_empty() => return Err(FrontMatterError::MissingOpening),
            None => {}
            Some(start) if is_marker => return Ok((&content[start..offset], &content[end..])),
            Some(_) => {}
        }

        offset = end;
    }

    match yaml_start {
        None => Err(FrontMatterError::MissingOpening),
        Some(_) => Err(FrontMatterError::Unterminated),
    }
}
