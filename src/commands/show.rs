//! Show a single post

use anyhow::{Context, Result};
use std::fmt::Write;

use crate::content::render_toc_html;
use crate::helpers::full_date;
use crate::Folio;

/// Render a post for the terminal, or as the JSON the server returns
pub fn render(folio: &Folio, slug: &str, json: bool) -> Result<String> {
    let view = folio
        .repository()
        .get_post_view(slug)?
        .with_context(|| format!("No post found for slug {:?}", slug))?;

    if json {
        return Ok(serde_json::to_string_pretty(&view)?);
    }

    let post = &view.post;
    let mut out = String::new();
    writeln!(out, "{}", post.title)?;
    writeln!(
        out,
        "{} by {} ({} min read)",
        full_date(&post.date),
        post.author,
        post.reading_minutes
    )?;
    if let Some(category) = &post.category {
        writeln!(out, "Category: {}", category)?;
    }
    if !post.tags.is_empty() {
        writeln!(out, "Tags: {}", post.tags.join(", "))?;
    }
    if !post.description.is_empty() {
        writeln!(out, "\n{}", post.description)?;
    }
    writeln!(out, "\n{}", post.content)?;
    Ok(out)
}

/// Render a post's table of contents, indented by level
pub fn render_toc(folio: &Folio, slug: &str, html: bool) -> Result<String> {
    let post = folio
        .repository()
        .get_post_by_slug(slug)?
        .with_context(|| format!("No post found for slug {:?}", slug))?;

    let entries = crate::content::build_toc(&post.raw);
    if html {
        return Ok(render_toc_html(&entries, 6));
    }

    let top = entries.iter().map(|e| e.level).min().unwrap_or(1);
    let mut out = String::new();
    for entry in &entries {
        let indent = "  ".repeat(usize::from(entry.level - top));
        writeln!(out, "{}- {} (#{})", indent, entry.text, entry.anchor_id)?;
    }
    Ok(out)
}

pub fn run(folio: &Folio, slug: &str, json: bool) -> Result<()> {
    println!("{}", render(folio, slug, json)?);
    Ok(())
}

pub fn run_toc(folio: &Folio, slug: &str, html: bool) -> Result<()> {
    print!("{}", render_toc(folio, slug, html)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site() -> (tempfile::TempDir, Folio) {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        fs::create_dir_all(&folio.content_dir).unwrap();
        fs::write(
            folio.content_dir.join("guide.md"),
            "---\ntitle: Guide\ndate: 2024-01-15\ntags: [a, b]\n---\n\
             ## Setup\n\n### Install\n\n```sh\n# not a heading\n```\n\n## Setup\n",
        )
        .unwrap();
        (dir, folio)
    }

    #[test]
    fn test_show_text() {
        let (_dir, folio) = site();
        let out = render(&folio, "guide", false).unwrap();
        assert!(out.starts_with("Guide\nJanuary 15, 2024 by John Doe (1 min read)\n"));
        assert!(out.contains("Tags: a, b"));
        assert!(out.contains(r#"<h2 id="setup-2">"#));
    }

    #[test]
    fn test_show_json() {
        let (_dir, folio) = site();
        let out = render(&folio, "guide", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["slug"], "guide");
        assert_eq!(value["toc"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_show_missing() {
        let (_dir, folio) = site();
        assert!(render(&folio, "missing", false).is_err());
    }

    #[test]
    fn test_toc_text() {
        let (_dir, folio) = site();
        assert_eq!(
            render_toc(&folio, "guide", false).unwrap(),
            "- Setup (#setup)\n  - Install (#install)\n- Setup (#setup-2)\n"
        );
    }
}
