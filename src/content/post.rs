//! Post model and the views handed to callers

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use super::toc::{nest, TocEntry, TocNode};
use crate::helpers::{category_key, count_words};

/// Words per minute used for reading time estimates
const WORDS_PER_MINUTE: usize = 200;

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Slug (file stem), unique across posts
    pub slug: String,

    /// Post title
    pub title: String,

    /// Short summary shown in listings
    pub description: String,

    /// Post author
    pub author: String,

    /// Publication date
    pub date: DateTime<Utc>,

    /// Last updated date
    pub updated: Option<DateTime<Utc>>,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// Post category
    pub category: Option<String>,

    /// Featured posts rank higher in the sitemap
    pub featured: bool,

    /// Rendered HTML content
    pub content: String,

    /// Raw markdown content
    #[serde(skip)]
    pub raw: String,

    /// Estimated reading time in minutes
    pub reading_minutes: usize,

    /// Full source file path
    #[serde(skip)]
    pub full_source: PathBuf,

    /// Custom front-matter fields
    #[serde(skip)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: String, title: String, date: DateTime<Utc>) -> Self {
        Self {
            slug,
            title,
            description: String::new(),
            author: String::new(),
            date,
            updated: None,
            tags: Vec::new(),
            category: None,
            featured: false,
            content: String::new(),
            raw: String::new(),
            reading_minutes: 1,
            full_source: PathBuf::new(),
            extra: HashMap::new(),
        }
    }

    /// Date the post last changed
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated.unwrap_or(self.date)
    }

    /// Whether the post belongs to a category, ignoring case
    pub fn in_category(&self, name: &str) -> bool {
        self.category
            .as_deref()
            .map(|c| category_key(c) == category_key(name))
            .unwrap_or(false)
    }

    /// Whether the post carries a tag (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Get the newer neighbour in a newest-first list
    pub fn newer<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        pos.checked_sub(1).map(|i| &posts[i])
    }

    /// Get the older neighbour in a newest-first list
    pub fn older<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}

/// Estimated reading time for a markdown body
pub fn reading_minutes(markdown: &str) -> usize {
    count_words(markdown).div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Post metadata without the rendered body
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub reading_minutes: usize,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            author: post.author.clone(),
            date: post.date,
            tags: post.tags.clone(),
            category: post.category.clone(),
            featured: post.featured,
            reading_minutes: post.reading_minutes,
        }
    }
}

/// Everything a post page needs: the post, its outline, and its neighbours
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub toc: Vec<TocNode>,
    pub newer: Option<PostSummary>,
    pub older: Option<PostSummary>,
}

impl PostView {
    pub fn new(post: Post, toc: &[TocEntry]) -> Self {
        Self {
            post,
            toc: nest(toc),
            newer: None,
            older: None,
        }
    }

    /// Fill in the neighbours from a newest-first listing
    pub fn with_neighbours(mut self, posts: &[Post]) -> Self {
        self.newer = self.post.newer(posts).map(PostSummary::from);
        self.older = self.post.older(posts).map(PostSummary::from);
        self
    }
}
