//! Generator module - writes post, index and category pages and mirrors assets

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{sort_by_date_desc, Category, Post, PostEntry, INDEX_FILE};
use crate::error::{BlogError, Result};
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Writes rendered pages into the output directory
pub struct SiteWriter<'a> {
    blog: &'a Blog,
    renderer: &'a TemplateRenderer,
    /// Every known category name, sorted
    categories: Vec<String>,
}

impl<'a> SiteWriter<'a> {
    /// Create a new writer
    pub fn new(
        blog: &'a Blog,
        renderer: &'a TemplateRenderer,
        categories: &BTreeMap<String, Category>,
    ) -> Self {
        Self {
            blog,
            renderer,
            categories: categories.keys().cloned().collect(),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("base_url", &self.blog.config.base_url);
        context.insert("site_title", &self.blog.config.title);
        context.insert("categories", &self.categories);
        context
    }

    /// Generate individual post pages
    pub fn write_post_pages(&self, posts: &[Post]) -> Result<usize> {
        for post in posts {
            let mut context = self.create_base_context();
            context.insert("metadata", &post.meta);
            context.insert("content", &post.content);

            let html = self.renderer.render_post(&context)?;
            let output_path = self.blog.output_dir.join(&post.filename);
            write_file(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        Ok(posts.len())
    }

    /// Generate the index page, newest post first
    pub fn write_index(&self, posts: &[Post]) -> Result<()> {
        let mut entries: Vec<PostEntry> = posts.iter().map(Post::entry).collect();
        sort_by_date_desc(&mut entries);

        let mut context = self.create_base_context();
        context.insert("posts", &entries);

        let html = self.renderer.render_index(&context)?;
        let output_path = self.blog.output_dir.join(INDEX_FILE);
        write_file(&output_path, &html)?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(())
    }

    /// Generate one listing page per category
    pub fn write_category_pages(&self, categories: &BTreeMap<String, Category>) -> Result<usize> {
        let category_dir = self.blog.category_output_dir();

        for category in categories.values() {
            let mut posts = category.posts.clone();
            sort_by_date_desc(&mut posts);

            let mut context = self.create_base_context();
            context.insert("category", &category.name);
            context.insert("posts", &posts);

            let html = self.renderer.render_category(&context)?;
            let output_path = category_dir.join(category.file_name());
            write_file(&output_path, &html)?;
            tracing::debug!("Generated category: {:?}", output_path);
        }

        tracing::info!("Generated {} category pages", categories.len());
        Ok(categories.len())
    }
}

/// Mirror the assets tree into the output directory.
///
/// Existing files are overwritten, anything else already in the destination is
/// left alone. Returns the number of files copied.
pub fn copy_assets(blog: &Blog) -> Result<usize> {
    let source_dir = &blog.assets_dir;
    if !source_dir.is_dir() {
        tracing::warn!("Assets directory {:?} not found, skipping", source_dir);
        return Ok(0);
    }

    let dest_dir = blog.assets_output_dir();
    let mut copied = 0;

    for entry in WalkDir::new(source_dir).follow_links(true) {
        let entry = entry.map_err(|e| BlogError::fs(source_dir, e.into()))?;
        let path = entry.path();
        let relative = path.strip_prefix(source_dir).unwrap_or(path);
        let dest = dest_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| BlogError::fs(&dest, e))?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| BlogError::fs(parent, e))?;
            }
            fs::copy(path, &dest).map_err(|e| BlogError::fs(&dest, e))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Write a page, creating parent directories; replaces any previous content
fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BlogError::fs(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| BlogError::fs(path, e))
}
