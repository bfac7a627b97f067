//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{BlogError, Result};

/// Environment variable that overrides `base_url`
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub base_url: String,

    // Directory
    pub posts_dir: String,
    pub templates_dir: String,
    pub output_dir: String,
    pub assets_dir: String,
    pub category_dir: String,

    // Templates
    pub post_template: String,
    pub index_template: String,
    pub category_template: String,

    // Writing
    pub markdown_extensions: Vec<String>,
    #[serde(default)]
    pub highlight: HighlightConfig,
    pub skip_invalid_posts: bool,
    pub clean_output: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            base_url: "/".to_string(),

            posts_dir: "posts".to_string(),
            templates_dir: "templates".to_string(),
            output_dir: "output".to_string(),
            assets_dir: "assets".to_string(),
            category_dir: "categories".to_string(),

            post_template: "post_template.html".to_string(),
            index_template: "index_template.html".to_string(),
            category_template: "category_template.html".to_string(),

            markdown_extensions: vec!["md".to_string()],
            highlight: HighlightConfig::default(),
            skip_invalid_posts: false,
            clean_output: false,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| BlogError::fs(path, e))?;
        Self::parse(&content).map_err(|e| BlogError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Apply the `BASE_URL` environment override
    pub fn apply_env(&mut self) {
        self.apply_base_url(std::env::var(BASE_URL_ENV).ok());
    }

    fn apply_base_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.is_empty()) {
            tracing::debug!("base_url overridden by {}: {}", BASE_URL_ENV, url);
            self.base_url = url;
        }
    }

    /// Check whether a file extension is one of the markdown extensions
    pub fn is_markdown_ext(&self, ext: &str) -> bool {
        self.markdown_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Code block highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "InspiredGitHub".to_string(),
        }
    }
}
