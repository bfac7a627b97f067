//! Create a new post

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::normalize_category;
use crate::Blog;

/// Write a scaffold post named after the slugified title
pub fn create_post(blog: &Blog, title: &str, category: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&blog.posts_dir)
        .with_context(|| format!("Failed to create {:?}", blog.posts_dir))?;

    let file_path = blog.posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    fs::write(&file_path, scaffold(title, &today, category))
        .with_context(|| format!("Failed to write {:?}", file_path))?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}

fn scaffold(title: &str, date: &str, category: &str) -> String {
    format!(
        "---\ntitle: {}\ndate: {}\ncategory: {}\n---\n\n",
        yaml_quote(title),
        date,
        yaml_quote(&normalize_category(category))
    )
}

/// Double-quote a scalar so YAML punctuation in it stays a plain string
fn yaml_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
