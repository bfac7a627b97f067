//! Content module - handles posts, categories, and content processing

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{normalize_category, FrontMatter, FrontMatterError, PostMeta, MARKER};
pub use loader::{Collection, PostCollector, INDEX_FILE};
pub use markdown::MarkdownRenderer;
pub use post::{
    category_file_name, parse_date_string, sort_by_date_desc, Category, Dated, Post, PostEntry,
    PostSummary,
};
