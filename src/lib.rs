//! blogsmith: a small static blog generator
//!
//! Markdown posts with YAML front matter are rendered through Tera templates
//! into post pages, a chronological index and per-category listing pages.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod templates;

use std::path::{Path, PathBuf};

pub use error::{BlogError, Result};

/// Name of the optional site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// A blog site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown sources
    pub posts_dir: PathBuf,
    /// Template directory
    pub templates_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    /// Static assets, mirrored to `<output>/<assets dir name>`
    pub assets_dir: PathBuf,
}

impl Blog {
    /// Open a site, reading `_config.yml` when present and applying `BASE_URL`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();

        Self {
            posts_dir: base_dir.join(&config.posts_dir),
            templates_dir: base_dir.join(&config.templates_dir),
            output_dir: base_dir.join(&config.output_dir),
            assets_dir: base_dir.join(&config.assets_dir),
            config,
            base_dir,
        }
    }

    /// Directory category pages are written to
    pub fn category_output_dir(&self) -> PathBuf {
        self.output_dir.join(&self.config.category_dir)
    }

    /// Where the assets tree lands inside the output directory
    pub fn assets_output_dir(&self) -> PathBuf {
        let name = self
            .assets_dir
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("assets"));
        self.output_dir.join(name)
    }

    /// Generate the static site
    pub fn generate(&self) -> anyhow::Result<commands::generate::GenerateReport> {
        commands::generate::run(self)
    }

    /// Clean the output directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, category: &str) -> anyhow::Result<PathBuf> {
        commands::new::create_post(self, title, category)
    }
}
