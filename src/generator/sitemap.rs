//! Sitemap generation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::content::repository::{group_categories, group_tags};
use crate::content::Post;
use crate::helpers::{category_path, date_xml, escape_xml, full_url_for, post_path, tag_path};

pub const FEATURED_POST_PRIORITY: f32 = 0.9;
pub const POST_PRIORITY: f32 = 0.6;
pub const CATEGORY_PRIORITY: f32 = 0.5;
pub const TAG_PRIORITY: f32 = 0.4;

/// How often a crawler should expect a page to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

/// One `<url>` in the sitemap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

impl SitemapEntry {
    fn new(
        url: String,
        last_modified: DateTime<Utc>,
        change_frequency: ChangeFrequency,
        priority: f32,
    ) -> Self {
        Self {
            url,
            last_modified,
            change_frequency,
            priority,
        }
    }
}

/// Build the sitemap entries for a newest-first post listing.
///
/// Static pages come first, then posts, categories, and tags that at least
/// `sitemap.tag_min_posts` posts share. Static pages are stamped with
/// `generated_at`.
pub fn build_sitemap(
    config: &SiteConfig,
    posts: &[Post],
    generated_at: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let mut entries = Vec::new();

    for page in &config.sitemap.static_pages {
        entries.push(SitemapEntry::new(
            full_url_for(config, &page.path),
            generated_at,
            page.change_frequency,
            page.priority,
        ));
    }

    for post in posts {
        let priority = if post.featured {
            FEATURED_POST_PRIORITY
        } else {
            POST_PRIORITY
        };
        entries.push(SitemapEntry::new(
            full_url_for(config, &post_path(config, &post.slug)),
            post.last_modified(),
            ChangeFrequency::Monthly,
            priority,
        ));
    }

    for category in group_categories(posts) {
        entries.push(SitemapEntry::new(
            full_url_for(config, &category_path(config, &category.name)),
            category.last_modified,
            ChangeFrequency::Weekly,
            CATEGORY_PRIORITY,
        ));
    }

    for tag in group_tags(posts) {
        if tag.count < config.sitemap.tag_min_posts {
            continue;
        }
        entries.push(SitemapEntry::new(
            full_url_for(config, &tag_path(config, &tag.name)),
            tag.last_modified,
            ChangeFrequency::Weekly,
            TAG_PRIORITY,
        ));
    }

    entries
}

/// Render entries as a sitemaps.org urlset document
pub fn render_sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.url)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            date_xml(&entry.last_modified)
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_frequency.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
