//! Content module - front-matter store, post repository, rendering and outlines

mod error;
mod frontmatter;
mod markdown;
mod post;
pub mod repository;
pub mod store;
pub mod toc;

pub use error::ContentError;
pub use frontmatter::{parse_date_string, FrontMatter};
pub use markdown::MarkdownRenderer;
pub use post::{reading_minutes, Post, PostSummary, PostView};
pub use repository::{PostRepository, ScanReport, Taxon};
pub use store::{is_valid_slug, FrontMatterStore, SourceFile};
pub use toc::{build_toc, nest, render_toc_html, TocEntry, TocNode};
