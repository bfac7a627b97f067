//! Post collector - loads posts from the posts directory and groups them by category

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{category_file_name, Category, FrontMatter, MarkdownRenderer, Post};
use crate::error::{BlogError, Result};
use crate::Blog;

/// Output file name of the index page, unavailable to posts
pub const INDEX_FILE: &str = "index.html";

/// Everything collected from the posts directory
#[derive(Debug, Default)]
pub struct Collection {
    /// Posts in encounter order
    pub posts: Vec<Post>,
    /// Categories keyed by normalized name
    pub categories: BTreeMap<String, Category>,
    /// Files left out under the skip-invalid policy
    pub skipped: Vec<PathBuf>,
}

impl Collection {
    /// Category names, sorted
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    fn push(&mut self, post: Post) {
        self.categories
            .entry(post.category().to_string())
            .or_insert_with(|| Category::new(post.category()))
            .posts
            .push(post.summary());
        self.posts.push(post);
    }
}

/// Loads posts from the posts directory
pub struct PostCollector<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
    skip_invalid: bool,
}

impl<'a> PostCollector<'a> {
    /// Create a new post collector
    pub fn new(blog: &'a Blog) -> Self {
        Self {
            blog,
            renderer: MarkdownRenderer::with_options(&blog.config.highlight),
            skip_invalid: blog.config.skip_invalid_posts,
        }
    }

    /// Skip malformed posts with a warning instead of failing the run
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Load every markdown file directly inside the posts directory.
    ///
    /// Files are visited in file-name order.
    pub fn collect(&self) -> Result<Collection> {
        let posts_dir = &self.blog.posts_dir;
        if !posts_dir.is_dir() {
            return Err(BlogError::fs(
                posts_dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "posts directory not found"),
            ));
        }

        let mut collection = Collection::default();

        for entry in WalkDir::new(posts_dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| BlogError::fs(posts_dir, e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_markdown_file(path) {
                continue;
            }

            let post = match self.load_post(path) {
                Ok(Some(post)) => post,
                Ok(None) => {
                    tracing::info!("Skipping draft {:?}", path);
                    continue;
                }
                Err(e) if self.skip_invalid && e.is_post_error() => {
                    tracing::warn!("Skipping post: {}", e);
                    collection.skipped.push(path.to_path_buf());
                    continue;
                }
                Err(e) => return Err(e),
            };

            check_output_names(&collection, &post)?;

            tracing::debug!("Collected {:?} into {}", path, post.category());
            collection.push(post);
        }

        Ok(collection)
    }

    /// Load a single post; drafts yield `None`
    fn load_post(&self, path: &Path) -> Result<Option<Post>> {
        let bytes = fs::read(path).map_err(|e| BlogError::fs(path, e))?;
        let content = String::from_utf8(bytes).map_err(|_| BlogError::MalformedPost {
            path: path.to_path_buf(),
            reason: "file is not valid UTF-8".to_string(),
        })?;

        let (fm, body) = FrontMatter::parse(&content).map_err(|e| BlogError::MalformedPost {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if fm.is_draft() {
            return Ok(None);
        }

        let meta = fm.into_meta(path)?;

        Ok(Some(Post {
            filename: output_file_name(path),
            source: path.to_path_buf(),
            meta,
            content: self.renderer.render(body),
        }))
    }

    fn is_markdown_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.blog.config.is_markdown_ext(e))
            .unwrap_or(false)
    }
}

/// Reject a post whose page or category page would overwrite another page
fn check_output_names(collection: &Collection, post: &Post) -> Result<()> {
    let clash = |reason: String| BlogError::MalformedPost {
        path: post.source.clone(),
        reason,
    };

    if post.filename == INDEX_FILE {
        return Err(clash(format!(
            "output file {} is reserved for the index page",
            INDEX_FILE
        )));
    }

    if let Some(other) = collection
        .posts
        .iter()
        .find(|p| p.filename == post.filename)
    {
        return Err(clash(format!(
            "output file {} is already produced by {:?}",
            post.filename, other.source
        )));
    }

    let category = post.category();
    if !collection.categories.contains_key(category) {
        let file_name = category_file_name(category);
        if let Some(other) = collection
            .categories
            .values()
            .find(|c| c.file_name() == file_name)
        {
            return Err(clash(format!(
                "category {:?} would share page {} with category {:?}",
                category, file_name, other.name
            )));
        }
    }

    Ok(())
}

/// Source file name with its extension replaced by `.html`
pub fn output_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}.html", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn site_with(posts: &[(&str, &str)]) -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("posts");
        fs::create_dir_all(&posts_dir).unwrap();
        for (name, content) in posts {
            fs::write(posts_dir.join(name), content).unwrap();
        }
        let config = SiteConfig {
            highlight: crate::config::HighlightConfig {
                enable: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let blog = Blog::with_config(dir.path(), config);
        (dir, blog)
    }

    fn post(title: &str, date: &str, category: &str) -> String {
        format!(
            "---\ntitle: {}\ndate: {}\ncategory: {}\n---\n\nBody of *{}*.\n",
            title, date, category, title
        )
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name(Path::new("posts/hello.md")), "hello.html");
        assert_eq!(
            output_file_name(Path::new("posts/v1.2-notes.md")),
            "v1.2-notes.html"
        );
    }

    #[test]
    fn test_collect_groups_by_normalized_category() {
        let (_dir, blog) = site_with(&[
            ("a.md", post("First", "2024-01-01", "tech").as_str()),
            ("b.md", post("Second", "2024-02-01", "Tech").as_str()),
            ("c.md", post("Third", "2024-03-01", "life").as_str()),
            ("notes.txt", "not a post"),
        ]);

        let collection = PostCollector::new(&blog).collect().unwrap();
        assert_eq!(collection.posts.len(), 3);
        assert_eq!(collection.category_names(), vec!["Life", "Tech"]);

        let tech = &collection.categories["Tech"];
        let titles: Vec<_> = tech.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);

        let first = &collection.posts[0];
        assert_eq!(first.filename, "a.html");
        assert!(first.content.contains("<em>First</em>"));
    }

    #[test]
    fn test_collect_ignores_subdirectories() {
        let (dir, blog) = site_with(&[("a.md", post("A", "2024-01-01", "x").as_str())]);
        let nested = dir.path().join("posts/drafts");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.md"), post("B", "2024-01-02", "x")).unwrap();

        let collection = PostCollector::new(&blog).collect().unwrap();
        assert_eq!(collection.posts.len(), 1);
    }

    #[test]
    fn test_malformed_post_fails_fast() {
        let (_dir, blog) = site_with(&[
            ("a.md", post("A", "2024-01-01", "x").as_str()),
            ("broken.md", "no front matter here"),
        ]);

        let err = PostCollector::new(&blog).collect().unwrap_err();
        assert!(matches!(err, BlogError::MalformedPost { .. }));
        assert!(err.to_string().contains("broken.md"));
    }

    #[test]
    fn test_missing_field_fails_fast() {
        let (_dir, blog) = site_with(&[("a.md", "---\ntitle: A\ndate: 2024-01-01\n---\nbody")]);

        let err = PostCollector::new(&blog).collect().unwrap_err();
        assert!(matches!(
            err,
            BlogError::MissingField {
                field: "category",
                ..
            }
        ));
    }

    #[test]
    fn test_skip_invalid_keeps_going() {
        let (_dir, blog) = site_with(&[
            ("a.md", post("A", "2024-01-01", "x").as_str()),
            ("broken.md", "---\ntitle: never closed\n"),
            ("c.md", "---\ntitle: C\n---\n"),
        ]);

        let collection = PostCollector::new(&blog)
            .skip_invalid(true)
            .collect()
            .unwrap();
        assert_eq!(collection.posts.len(), 1);
        assert_eq!(collection.skipped.len(), 2);
    }

    #[test]
    fn test_drafts_are_left_out() {
        let (_dir, blog) = site_with(&[
            ("a.md", post("A", "2024-01-01", "x").as_str()),
            (
                "wip.md",
                "---\ntitle: WIP\ndate: 2024-01-02\ncategory: x\ndraft: true\n---\n",
            ),
        ]);

        let collection = PostCollector::new(&blog).collect().unwrap();
        assert_eq!(collection.posts.len(), 1);
        assert_eq!(collection.categories["X"].posts.len(), 1);
    }

    #[test]
    fn test_colliding_output_names() {
        let (_dir, mut blog) = site_with(&[
            ("a.md", post("A", "2024-01-01", "x").as_str()),
            ("a.markdown", post("A2", "2024-01-02", "x").as_str()),
        ]);
        blog.config.markdown_extensions = vec!["md".to_string(), "markdown".to_string()];

        let err = PostCollector::new(&blog).collect().unwrap_err();
        assert!(err.to_string().contains("a.html"));
    }

    #[test]
    fn test_post_cannot_take_index_page() {
        let (_dir, blog) = site_with(&[
            ("a.md", post("A", "2024-01-01", "x").as_str()),
            ("index.md", post("Home", "2024-01-02", "x").as_str()),
        ]);

        let err = PostCollector::new(&blog).collect().unwrap_err();
        assert!(matches!(err, BlogError::MalformedPost { .. }));
        let msg = err.to_string();
        assert!(msg.contains("index.md"));
        assert!(msg.contains("reserved for the index page"));
    }

    #[test]
    fn test_categories_sharing_a_page() {
        let (_dir, blog) = site_with(&[
            ("a.md", post("A", "2024-01-01", "Rust/Async").as_str()),
            ("b.md", post("B", "2024-01-02", "Rust/Async").as_str()),
            ("c.md", post("C", "2024-01-03", "Rust-Async").as_str()),
        ]);

        let err = PostCollector::new(&blog).collect().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("c.md"));
        assert!(msg.contains("Rust-Async.html"));
        assert!(msg.contains("\"Rust/Async\""));
    }

    #[test]
    fn test_missing_posts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        assert!(matches!(
            PostCollector::new(&blog).collect(),
            Err(BlogError::Filesystem { .. })
        ));
    }
}
