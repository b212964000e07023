//! Atom feed generation

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{absolutize_urls, escape_xml, full_url_for, post_path, strip_invalid_xml_chars};

/// Render an Atom feed of the newest `feed.limit` posts
pub fn render_atom_feed(config: &SiteConfig, posts: &[Post], generated_at: DateTime<Utc>) -> String {
    let base_url = config.url.trim_end_matches('/');

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    if !config.description.is_empty() {
        feed.push_str(&format!(
            "  <subtitle>{}</subtitle>\n",
            escape_xml(&config.description)
        ));
    }
    feed.push_str(&format!(
        "  <link href=\"{}\" rel=\"self\"/>\n",
        escape_xml(&full_url_for(config, &config.feed.path))
    ));
    feed.push_str(&format!("  <link href=\"{}/\"/>\n", escape_xml(base_url)));
    feed.push_str(&format!(
        "  <updated>{}</updated>\n",
        posts
            .first()
            .map(|p| p.last_modified())
            .unwrap_or(generated_at)
            .to_rfc3339()
    ));
    feed.push_str(&format!("  <id>{}/</id>\n", escape_xml(base_url)));
    feed.push_str(&format!(
        "  <author><name>{}</name></author>\n",
        escape_xml(&config.author)
    ));

    for post in posts.iter().take(config.feed.limit) {
        let link = escape_xml(&full_url_for(config, &post_path(config, &post.slug)));
        feed.push_str("  <entry>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
        feed.push_str(&format!("    <id>{}</id>\n", link));
        feed.push_str(&format!(
            "    <published>{}</published>\n",
            post.date.to_rfc3339()
        ));
        feed.push_str(&format!(
            "    <updated>{}</updated>\n",
            post.last_modified().to_rfc3339()
        ));
        if !post.author.is_empty() {
            feed.push_str(&format!(
                "    <author><name>{}</name></author>\n",
                escape_xml(&post.author)
            ));
        }
        if !post.description.is_empty() {
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&post.description)
            ));
        }
        if let Some(category) = &post.category {
            feed.push_str(&format!(
                "    <category term=\"{}\"/>\n",
                escape_xml(category)
            ));
        }
        let content = strip_invalid_xml_chars(&absolutize_urls(&post.content, base_url));
        feed.push_str(&format!(
            "    <content type=\"html\"><![CDATA[{}]]></content>\n",
            content.replace("]]>", "]]]]><![CDATA[>")
        ));
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> SiteConfig {
        SiteConfig {
            title: "Notes & Things".to_string(),
            url: "https://folio.dev/".to_string(),
            ..Default::default()
        }
    }

    fn post(slug: &str, day: u32) -> Post {
        let mut post = Post::new(
            slug.to_string(),
            format!("Post {}", slug),
            Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        );
        post.content = r#"<p><a href="/blog/other">link</a></p>"#.to_string();
        post
    }

    #[test]
    fn test_feed_structure() {
        let posts = vec![post("b", 2), post("a", 1)];
        let xml = render_atom_feed(&config(), &posts, Utc::now());

        assert!(xml.contains("<title>Notes &amp; Things</title>"));
        assert!(xml.contains(r#"<link href="https://folio.dev/atom.xml" rel="self"/>"#));
        assert!(xml.contains("<updated>2024-01-02T00:00:00+00:00</updated>"));
        assert!(xml.contains("<id>https://folio.dev/blog/b</id>"));
        assert!(xml.contains(r#"href="https://folio.dev/blog/other""#));
        assert_eq!(xml.matches("<entry>").count(), 2);
    }

    #[test]
    fn test_feed_limit() {
        let mut config = config();
        config.feed.limit = 1;
        let posts = vec![post("b", 2), post("a", 1)];
        let xml = render_atom_feed(&config, &posts, Utc::now());
        assert_eq!(xml.matches("<entry>").count(), 1);
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let mut p = post("a", 1);
        p.content = "<p>a ]]> b</p>".to_string();
        let xml = render_atom_feed(&config(), &[p], Utc::now());
        assert_eq!(xml.matches("]]>").count(), 2);
    }
}
