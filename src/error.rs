//! Error types for the generation pipeline

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while building a site
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Failed to load templates: {0}")]
    TemplateLoad(String),

    #[error("Failed to render {template}: {reason}")]
    Render { template: String, reason: String },

    #[error("Malformed post {path:?}: {reason}")]
    MalformedPost { path: PathBuf, reason: String },

    #[error("Post {path:?} is missing required field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl BlogError {
    /// Wrap an I/O error with the path it happened at
    pub fn fs(path: impl AsRef<Path>, source: io::Error) -> Self {
        BlogError::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the skip-invalid policy may swallow this error
    pub fn is_post_error(&self) -> bool {
        matches!(
            self,
            BlogError::MalformedPost { .. } | BlogError::MissingField { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_errors_are_skippable() {
        let malformed = BlogError::MalformedPost {
            path: PathBuf::from("posts/a.md"),
            reason: "no front matter".to_string(),
        };
        let missing = BlogError::MissingField {
            path: PathBuf::from("posts/a.md"),
            field: "title",
        };
        assert!(malformed.is_post_error());
        assert!(missing.is_post_error());

        let fs_err = BlogError::fs("output", io::Error::other("disk full"));
        assert!(!fs_err.is_post_error());
        assert!(!BlogError::TemplateLoad("x".into()).is_post_error());
    }

    #[test]
    fn test_messages_carry_context() {
        let missing = BlogError::MissingField {
            path: PathBuf::from("posts/a.md"),
            field: "date",
        };
        let msg = missing.to_string();
        assert!(msg.contains("a.md"));
        assert!(msg.contains("`date`"));
    }
}
