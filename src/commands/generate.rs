//! Generate static files

use anyhow::{Context as _, Result};
use std::fmt;
use std::fs;

use crate::content::PostCollector;
use crate::error::BlogError;
use crate::generator::{copy_assets, SiteWriter};
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Steps of a generation run, in the order they execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadTemplates,
    PrepareOutputDir,
    CopyAssets,
    CollectPosts,
    WritePostPages,
    WriteIndex,
    WriteCategoryPages,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LoadTemplates => "load templates",
            Stage::PrepareOutputDir => "prepare output directory",
            Stage::CopyAssets => "copy assets",
            Stage::CollectPosts => "collect posts",
            Stage::WritePostPages => "write post pages",
            Stage::WriteIndex => "write index page",
            Stage::WriteCategoryPages => "write category pages",
        };
        f.write_str(name)
    }
}

/// What a successful run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub posts: usize,
    pub categories: usize,
    pub assets: usize,
    pub skipped: usize,
}

/// Generate the static site
pub fn run(blog: &Blog) -> Result<GenerateReport> {
    let start = std::time::Instant::now();

    let renderer = stage(Stage::LoadTemplates, || {
        TemplateRenderer::load(&blog.templates_dir, &blog.config)
    })?;

    stage(Stage::PrepareOutputDir, || prepare_output_dir(blog))?;

    let assets = stage(Stage::CopyAssets, || copy_assets(blog))?;
    tracing::info!("Copied {} asset files", assets);

    let collection = stage(Stage::CollectPosts, || PostCollector::new(blog).collect())?;
    tracing::info!(
        "Loaded {} posts in {} categories",
        collection.posts.len(),
        collection.categories.len()
    );

    let writer = SiteWriter::new(blog, &renderer, &collection.categories);
    let posts = stage(Stage::WritePostPages, || {
        writer.write_post_pages(&collection.posts)
    })?;
    stage(Stage::WriteIndex, || writer.write_index(&collection.posts))?;
    let categories = stage(Stage::WriteCategoryPages, || {
        writer.write_category_pages(&collection.categories)
    })?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(GenerateReport {
        posts,
        categories,
        assets,
        skipped: collection.skipped.len(),
    })
}

/// Run one pipeline step, tagging any failure with the step name
fn stage<T>(which: Stage, step: impl FnOnce() -> crate::Result<T>) -> Result<T> {
    tracing::debug!("Stage: {}", which);
    step().with_context(|| format!("Failed to {}", which))
}

fn prepare_output_dir(blog: &Blog) -> crate::Result<()> {
    let output_dir = &blog.output_dir;
    if blog.config.clean_output && output_dir.exists() {
        fs::remove_dir_all(output_dir).map_err(|e| BlogError::fs(output_dir, e))?;
        tracing::info!("Deleted: {:?}", output_dir);
    }
    fs::create_dir_all(output_dir).map_err(|e| BlogError::fs(output_dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::LoadTemplates.to_string(), "load templates");
        assert_eq!(Stage::WriteCategoryPages.to_string(), "write category pages");
    }

    #[test]
    fn test_failure_names_stage() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), Default::default());

        let err = run(&blog).unwrap_err();
        assert_eq!(err.to_string(), "Failed to load templates");
        assert!(matches!(
            err.downcast_ref::<BlogError>(),
            Some(BlogError::TemplateLoad(_))
        ));
        assert!(!blog.output_dir.exists());
    }
}
