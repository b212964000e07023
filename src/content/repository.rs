//! Post repository - lookups and listings over the front-matter store

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::store::SourceFile;
use super::toc::build_toc;
use super::{ContentError, FrontMatterStore, MarkdownRenderer, Post, PostView};
use crate::config::SiteConfig;
use crate::helpers::category_key;

/// Result of reading the whole content directory
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Valid posts, newest first
    pub posts: Vec<Post>,
    /// Files left out of every listing, with the reason
    pub failures: Vec<(PathBuf, ContentError)>,
}

/// A category or tag with the posts filed under it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Taxon {
    pub name: String,
    pub count: usize,
    pub last_modified: DateTime<Utc>,
}

/// Read-only access to the posts in the content directory
pub struct PostRepository {
    store: FrontMatterStore,
    renderer: MarkdownRenderer,
    default_author: String,
    tz: Tz,
}

impl PostRepository {
    pub fn new(store: FrontMatterStore, renderer: MarkdownRenderer) -> Self {
        Self {
            store,
            renderer,
            default_author: String::new(),
            tz: Tz::UTC,
        }
    }

    /// Repository over `content_dir` using the site's author, timezone and
    /// highlighting settings
    pub fn from_config<P: AsRef<Path>>(config: &SiteConfig, content_dir: P) -> Self {
        Self::new(
            FrontMatterStore::new(content_dir),
            MarkdownRenderer::from_config(&config.highlight),
        )
        .with_default_author(&config.author)
        .with_timezone(config.tz())
    }

    pub fn with_default_author(mut self, author: &str) -> Self {
        self.default_author = author.to_string();
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    pub fn store(&self) -> &FrontMatterStore {
        &self.store
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Read every post, keeping malformed files aside instead of failing
    pub fn scan(&self) -> ScanReport {
        let mut report = ScanReport::default();

        for (path, result) in self.store.read_all() {
            match result {
                Ok(source) => report.posts.push(self.build_post(source)),
                Err(e) => {
                    tracing::warn!("Skipping post {:?}: {}", path, e);
                    report.failures.push((path, e));
                }
            }
        }

        sort_newest_first(&mut report.posts);
        tracing::debug!(
            "Scanned {:?}: {} posts, {} skipped",
            self.store.dir(),
            report.posts.len(),
            report.failures.len()
        );
        report
    }

    /// All valid posts, newest first
    pub fn get_all_posts(&self) -> Vec<Post> {
        self.scan().posts
    }

    /// Look up a post. A missing slug is `Ok(None)`, and so is a file whose
    /// front-matter is malformed, since such files are excluded everywhere.
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        match self.store.read(slug) {
            Ok(Some(source)) => Ok(Some(self.build_post(source))),
            Ok(None) => Ok(None),
            Err(e) if e.is_malformed() => {
                tracing::warn!("Post {:?} is malformed: {}", slug, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Slugs of all valid posts, newest first
    pub fn get_all_post_slugs(&self) -> Vec<String> {
        self.get_all_posts().into_iter().map(|p| p.slug).collect()
    }

    /// Post page data: the post, its outline and its neighbours
    pub fn get_post_view(&self, slug: &str) -> Result<Option<PostView>, ContentError> {
        let Some(post) = self.get_post_by_slug(slug)? else {
            return Ok(None);
        };
        let toc = build_toc(&post.raw);
        let posts = self.get_all_posts();
        Ok(Some(PostView::new(post, &toc).with_neighbours(&posts)))
    }

    pub fn featured_posts(&self) -> Vec<Post> {
        self.get_all_posts()
            .into_iter()
            .filter(|p| p.featured)
            .collect()
    }

    /// Posts in a category, compared case-insensitively
    pub fn posts_by_category(&self, name: &str) -> Vec<Post> {
        self.get_all_posts()
            .into_iter()
            .filter(|p| p.in_category(name))
            .collect()
    }

    pub fn posts_by_tag(&self, tag: &str) -> Vec<Post> {
        self.get_all_posts()
            .into_iter()
            .filter(|p| p.has_tag(tag))
            .collect()
    }

    pub fn categories(&self) -> Vec<Taxon> {
        group_categories(&self.get_all_posts())
    }

    pub fn tags(&self) -> Vec<Taxon> {
        group_tags(&self.get_all_posts())
    }

    fn build_post(&self, source: SourceFile) -> Post {
        let SourceFile {
            slug,
            path,
            front_matter: fm,
            body,
            modified,
        } = source;

        let date = match fm.parse_date(self.tz) {
            Some(date) => date,
            None => {
                if let Some(raw) = fm.date.as_deref() {
                    tracing::warn!("Post {:?} has an unreadable date {:?}, using now", slug, raw);
                    Utc::now()
                } else {
                    modified.unwrap_or_else(Utc::now)
                }
            }
        };

        let updated = fm.parse_updated(self.tz);

        let tags: Vec<String> = fm
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect();

        let category = fm
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string());

        let mut post = Post::new(slug, fm.title.unwrap_or_default().trim().to_string(), date);
        post.description = fm.description.unwrap_or_default();
        post.author = fm
            .author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| self.default_author.clone());
        post.updated = updated;
        post.tags = tags;
        post.category = category;
        post.featured = fm.featured;
        post.content = self.renderer.render(&body);
        post.reading_minutes = super::post::reading_minutes(&body);
        post.raw = body;
        post.full_source = path;
        post.extra = fm.extra;
        post
    }
}

/// Newest first; equal dates fall back to slug order so listings are stable
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}

/// Distinct categories (case-insensitive) in listing order
pub fn group_categories(posts: &[Post]) -> Vec<Taxon> {
    let mut groups: IndexMap<String, Taxon> = IndexMap::new();
    for post in posts {
        if let Some(name) = post.category.as_deref() {
            add_to_group(&mut groups, category_key(name), name, post);
        }
    }
    groups.into_values().collect()
}

/// Distinct tags in listing order; a post counts once per tag
pub fn group_tags(posts: &[Post]) -> Vec<Taxon> {
    let mut groups: IndexMap<String, Taxon> = IndexMap::new();
    for post in posts {
        let tags: IndexSet<&str> = post.tags.iter().map(|t| t.as_str()).collect();
        for tag in tags {
            add_to_group(&mut groups, tag.to_string(), tag, post);
        }
    }
    groups.into_values().collect()
}

fn add_to_group(groups: &mut IndexMap<String, Taxon>, key: String, name: &str, post: &Post) {
    let last_modified = post.last_modified();
    let taxon = groups.entry(key).or_insert_with(|| Taxon {
        name: name.to_string(),
        count: 0,
        last_modified,
    });
    taxon.count += 1;
    taxon.last_modified = taxon.last_modified.max(last_modified);
}
