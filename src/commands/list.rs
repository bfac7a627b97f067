//! List site content

use anyhow::Result;
use std::io::Write;

use crate::content::{sort_by_date_desc, Collection, PostCollector, PostEntry};
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let collection = PostCollector::new(blog).collect()?;
    let stdout = std::io::stdout();
    print(&collection, content_type, &mut stdout.lock())
}

fn print(collection: &Collection, content_type: &str, out: &mut impl Write) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let mut entries: Vec<PostEntry> = collection.posts.iter().map(|p| p.entry()).collect();
            sort_by_date_desc(&mut entries);
            writeln!(out, "Posts ({}):", entries.len())?;
            for post in entries {
                writeln!(
                    out,
                    "  {} - {} [{}] ({})",
                    post.date, post.title, post.category, post.filename
                )?;
            }
        }
        "category" | "categories" => {
            writeln!(out, "Categories ({}):", collection.categories.len())?;
            for (name, category) in &collection.categories {
                writeln!(out, "  {} ({})", name, category.posts.len())?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, category",
                content_type
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn collection() -> (tempfile::TempDir, Collection) {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("a.md"),
            "---\ntitle: First\ndate: 2024-01-01\ncategory: tech\n---\n",
        )
        .unwrap();
        fs::write(
            posts.join("b.md"),
            "---\ntitle: Second\ndate: 2024-02-01\ncategory: Tech\n---\n",
        )
        .unwrap();
        let blog = Blog::with_config(dir.path(), Default::default());
        let collection = PostCollector::new(&blog).collect().unwrap();
        (dir, collection)
    }

    #[test]
    fn test_list_posts() {
        let (_dir, collection) = collection();
        let mut out = Vec::new();
        print(&collection, "posts", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Posts (2):\n  2024-02-01 - Second [Tech] (b.html)\n  2024-01-01 - First [Tech] (a.html)\n"
        );
    }

    #[test]
    fn test_list_categories() {
        let (_dir, collection) = collection();
        let mut out = Vec::new();
        print(&collection, "category", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Categories (1):\n  Tech (2)\n");
    }

    #[test]
    fn test_unknown_type() {
        let (_dir, collection) = collection();
        let mut out = Vec::new();
        assert!(print(&collection, "tags", &mut out).is_err());
    }
}
