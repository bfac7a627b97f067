//! Clean the output directory

use anyhow::{Context, Result};
use std::fs;

use crate::Blog;

/// Remove the generated site
pub fn run(blog: &Blog) -> Result<()> {
    if blog.output_dir.exists() {
        fs::remove_dir_all(&blog.output_dir)
            .with_context(|| format!("Failed to delete {:?}", blog.output_dir))?;
        tracing::info!("Deleted: {:?}", blog.output_dir);
    }

    Ok(())
}
