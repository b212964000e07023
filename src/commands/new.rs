//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::is_valid_slug;
use crate::Folio;

/// Write a post skeleton to `<content_dir>/<slug>.md`. The slug defaults to
/// the slugified title.
pub fn create_post(folio: &Folio, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("A post needs a title");
    }

    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if !is_valid_slug(&slug) {
        anyhow::bail!("Invalid slug: {:?}", slug);
    }

    fs::create_dir_all(&folio.content_dir)?;
    let file_path = folio.content_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Utc::now().with_timezone(&folio.config.tz());
    let content = format!(
        "---\ntitle: {}\ndescription: \"\"\ndate: {}\ntags: []\ncategory: \"\"\nfeatured: false\n---\n\n",
        serde_yaml::to_string(title)?.trim_end(),
        now.format("%Y-%m-%d %H:%M:%S"),
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        let path = create_post(&folio, "Hello: A \"Quoted\" World", None).unwrap();
        assert!(path.ends_with("hello-a-quoted-world.md"));

        let post = folio
            .repository()
            .get_post_by_slug("hello-a-quoted-world")
            .unwrap()
            .unwrap();
        assert_eq!(post.title, "Hello: A \"Quoted\" World");
        assert!(post.category.is_none());
        assert!(!post.featured);
    }

    #[test]
    fn test_create_post_with_slug() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        let path = create_post(&folio, "Anything", Some("custom")).unwrap();
        assert!(path.ends_with("custom.md"));
    }

    #[test]
    fn test_create_post_refuses_existing_and_bad_slugs() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        create_post(&folio, "Once", None).unwrap();
        assert!(create_post(&folio, "Once", None).is_err());
        assert!(create_post(&folio, "Escape", Some("../up")).is_err());
        assert!(create_post(&folio, "   ", None).is_err());
    }
}
