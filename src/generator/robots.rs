//! robots.txt generation

use crate::config::SiteConfig;
use crate::helpers::full_url_for;

/// Render the crawl policy: shared disallow rules for every agent, a full
/// block for each listed crawler, and the sitemap location.
pub fn render_robots(config: &SiteConfig) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\n");
    for path in &config.robots.disallow {
        out.push_str(&format!("Disallow: {}\n", path));
    }

    for agent in &config.robots.blocked_agents {
        out.push_str(&format!("\nUser-agent: {}\nDisallow: /\n", agent));
    }

    out.push_str(&format!(
        "\nSitemap: {}\n",
        full_url_for(config, "sitemap.xml")
    ));
    out
}
