//! Generator module - writes the precomputed post data and site documents

pub mod feed;
pub mod robots;
pub mod sitemap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::content::PostSummary;
use crate::Folio;

/// Name of the post listing inside the blog output directory
pub const LISTING_FILE: &str = "_index.json";

/// What a build produced
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub posts: usize,
    pub skipped: Vec<PathBuf>,
    pub sitemap_entries: usize,
    pub elapsed: Duration,
}

/// Static output generator
pub struct Generator {
    folio: Folio,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Self {
        Self {
            folio: folio.clone(),
        }
    }

    /// Generate the entire public directory
    pub fn generate(&self) -> Result<BuildReport> {
        self.generate_at(Utc::now())
    }

    /// Generate with a fixed timestamp for the undated documents
    pub fn generate_at(&self, generated_at: DateTime<Utc>) -> Result<BuildReport> {
        let start = std::time::Instant::now();
        let config = &self.folio.config;
        let public_dir = &self.folio.public_dir;

        let repo = self.folio.repository();
        let scan = repo.scan();
        let posts = scan.posts;

        let blog_dir = public_dir.join(config.blog_dir.trim_matches('/'));
        fs::create_dir_all(&blog_dir)?;

        // One file per post, keyed by slug
        let mut written = 0;
        for slug in repo.get_all_post_slugs() {
            let Some(view) = repo.get_post_view(&slug)? else {
                tracing::warn!("Post {:?} disappeared during the build", slug);
                continue;
            };
            write_json(&blog_dir.join(format!("{}.json", slug)), &view)?;
            tracing::debug!("Generated post: {}", slug);
            written += 1;
        }

        // The leading underscore keeps the listing clear of every post slug
        let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();
        write_json(&blog_dir.join(LISTING_FILE), &summaries)?;

        let entries = sitemap::build_sitemap(config, &posts, generated_at);
        fs::write(
            public_dir.join("sitemap.xml"),
            sitemap::render_sitemap_xml(&entries),
        )?;
        tracing::info!("Generated sitemap.xml ({} urls)", entries.len());

        fs::write(public_dir.join("robots.txt"), robots::render_robots(config))?;
        tracing::info!("Generated robots.txt");

        if config.feed.enable {
            let feed_path = public_dir.join(config.feed.path.trim_start_matches('/'));
            if let Some(parent) = feed_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(
                &feed_path,
                feed::render_atom_feed(config, &posts, generated_at),
            )?;
            tracing::info!("Generated {}", config.feed.path);
        }

        Ok(BuildReport {
            posts: written,
            skipped: scan.failures.into_iter().map(|(path, _)| path).collect(),
            sitemap_entries: entries.len(),
            elapsed: start.elapsed(),
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
