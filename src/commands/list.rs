//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::Taxon;
use crate::helpers::short_date;
use crate::Folio;

/// Render a listing of the given type
pub fn render(folio: &Folio, content_type: &str) -> Result<String> {
    let repo = folio.repository();
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = repo.get_all_posts();
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                writeln!(
                    out,
                    "  {} - {} [{}]{}",
                    short_date(&post.date),
                    post.title,
                    post.slug,
                    if post.featured { " *" } else { "" }
                )?;
            }
        }
        "featured" => {
            let posts = repo.featured_posts();
            writeln!(out, "Featured ({}):", posts.len())?;
            for post in posts {
                writeln!(out, "  {} - {} [{}]", short_date(&post.date), post.title, post.slug)?;
            }
        }
        "slug" | "slugs" => {
            for slug in repo.get_all_post_slugs() {
                writeln!(out, "{}", slug)?;
            }
        }
        "tag" | "tags" => write_taxa(&mut out, "Tags", repo.tags())?,
        "category" | "categories" => write_taxa(&mut out, "Categories", repo.categories())?,
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, slugs, featured, tags, categories",
                content_type
            );
        }
    }

    Ok(out)
}

fn write_taxa(out: &mut String, heading: &str, mut taxa: Vec<Taxon>) -> Result<()> {
    writeln!(out, "{} ({}):", heading, taxa.len())?;
    // Most used first; ties keep listing order
    taxa.sort_by(|a, b| b.count.cmp(&a.count));
    for taxon in taxa {
        writeln!(out, "  {} ({})", taxon.name, taxon.count)?;
    }
    Ok(())
}

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    print!("{}", render(folio, content_type)?);
    Ok(())
}
