//! Site configuration (_config.yml)

use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::generator::sitemap::ChangeFrequency;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub timezone: String,

    // URL
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub blog_dir: String,
    pub category_dir: String,
    pub tag_dir: String,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Generated documents
    #[serde(default)]
    pub sitemap: SitemapConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub robots: RobotsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            timezone: String::new(),

            url: "http://example.com".to_string(),

            content_dir: "content/posts".to_string(),
            public_dir: "public".to_string(),
            blog_dir: "blog".to_string(),
            category_dir: "blog/category".to_string(),
            tag_dir: "blog/tag".to_string(),

            highlight: HighlightConfig::default(),

            sitemap: SitemapConfig::default(),
            feed: FeedConfig::default(),
            robots: RobotsConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Timezone used for frontmatter dates that carry no offset.
    /// Empty or unknown names fall back to UTC.
    pub fn tz(&self) -> Tz {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Tz::UTC;
        }
        name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!("Unknown timezone {:?}, using UTC", name);
            Tz::UTC
        })
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub line_number: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            line_number: false,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// A fixed page listed at the top of the sitemap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticPage {
    pub path: String,
    pub priority: f32,
    pub change_frequency: ChangeFrequency,
}

impl StaticPage {
    fn new(path: &str, priority: f32, change_frequency: ChangeFrequency) -> Self {
        Self {
            path: path.to_string(),
            priority,
            change_frequency,
        }
    }
}

/// Sitemap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    pub static_pages: Vec<StaticPage>,
    /// Minimum number of posts a tag needs before it gets a sitemap entry
    pub tag_min_posts: usize,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            static_pages: vec![
                StaticPage::new("/", 1.0, ChangeFrequency::Weekly),
                StaticPage::new("/blog", 0.8, ChangeFrequency::Weekly),
                StaticPage::new("/about", 0.7, ChangeFrequency::Monthly),
            ],
            tag_min_posts: 2,
        }
    }
}

/// Atom feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    pub limit: usize,
    pub path: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            limit: 20,
            path: "atom.xml".to_string(),
        }
    }
}

/// Crawl rules written to robots.txt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    pub disallow: Vec<String>,
    pub blocked_agents: Vec<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            disallow: ["/api/", "/private/", "/_next/", "/admin/"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            blocked_agents: [
                "GPTBot",
                "ChatGPT-User",
                "CCBot",
                "Google-Extended",
                "anthropic-ai",
                "Bytespider",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content/posts");
        assert_eq!(config.sitemap.static_pages.len(), 3);
        assert_eq!(config.sitemap.tag_min_posts, 2);
        assert_eq!(config.tz(), Tz::UTC);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Portfolio
author: Jane Roe
url: https://jane.dev
timezone: Europe/Berlin
highlight:
  enable: false
sitemap:
  tag_min_posts: 3
  static_pages:
    - path: /
      priority: 1.0
      change_frequency: weekly
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.author, "Jane Roe");
        assert!(!config.highlight.enable);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert_eq!(config.sitemap.tag_min_posts, 3);
        assert_eq!(config.sitemap.static_pages.len(), 1);
        assert_eq!(config.tz(), chrono_tz::Europe::Berlin);
        // Untouched sections keep their defaults
        assert_eq!(config.feed.limit, 20);
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert_eq!(config.tz(), Tz::UTC);
    }
}
