//! Print generated site documents

use anyhow::Result;
use chrono::Utc;

use crate::generator::{feed, robots, sitemap};
use crate::Folio;

pub fn sitemap(folio: &Folio) -> String {
    let posts = folio.repository().get_all_posts();
    let entries = sitemap::build_sitemap(&folio.config, &posts, Utc::now());
    sitemap::render_sitemap_xml(&entries)
}

pub fn robots(folio: &Folio) -> String {
    robots::render_robots(&folio.config)
}

pub fn feed(folio: &Folio) -> String {
    let posts = folio.repository().get_all_posts();
    feed::render_atom_feed(&folio.config, &posts, Utc::now())
}

/// Print the named document: `sitemap`, `robots` or `feed`
pub fn run(folio: &Folio, document: &str) -> Result<()> {
    let text = match document {
        "sitemap" => sitemap(folio),
        "robots" => robots(folio),
        "feed" => feed(folio),
        _ => anyhow::bail!("Unknown document: {}", document),
    };
    print!("{}", text);
    Ok(())
}
