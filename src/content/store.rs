//! Front-matter store - reads post sources from the content directory

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentError, FrontMatter};

lazy_static! {
    /// File stems that may be used as slugs (and therefore as URL segments)
    static ref SLUG_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap();
}

/// Lookup order matches the enumeration order (file names sorted bytewise)
const EXTENSIONS: [&str; 2] = ["markdown", "md"];

/// Check whether a slug is safe to turn into a file path
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug) && !slug.contains("..")
}

/// A parsed post source: front-matter plus the raw markdown body
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub slug: String,
    pub path: PathBuf,
    pub front_matter: FrontMatter,
    pub body: String,
    pub modified: Option<DateTime<Utc>>,
}

/// Reads `<dir>/<slug>.md` files
#[derive(Debug, Clone)]
pub struct FrontMatterStore {
    dir: PathBuf,
}

impl FrontMatterStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Enumerate post files, sorted by file name. A missing directory is empty.
    pub fn files(&self) -> Vec<(String, PathBuf)> {
        if !self.dir.is_dir() {
            tracing::debug!("Content directory {:?} does not exist", self.dir);
            return Vec::new();
        }

        let mut seen = HashSet::new();
        WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_markdown_file(e.path()))
            .filter_map(|e| {
                let slug = e.path().file_stem()?.to_str()?.to_string();
                if !is_valid_slug(&slug) {
                    tracing::warn!("Skipping {:?}: file name is not a usable slug", e.path());
                    return None;
                }
                // `post.markdown` and `post.md` would claim the same slug; first one wins
                if !seen.insert(slug.clone()) {
                    tracing::warn!("Skipping {:?}: slug {:?} is already taken", e.path(), slug);
                    return None;
                }
                Some((slug, e.into_path()))
            })
            .collect()
    }

    /// All slugs that have a source file, well-formed or not
    pub fn slugs(&self) -> Vec<String> {
        self.files().into_iter().map(|(slug, _)| slug).collect()
    }

    /// Read a single source by slug. `Ok(None)` when there is no such file.
    pub fn read(&self, slug: &str) -> Result<Option<SourceFile>, ContentError> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }

        for ext in EXTENSIONS {
            let path = self.dir.join(format!("{}.{}", slug, ext));
            match fs::read_to_string(&path) {
                Ok(content) => return parse_source(slug, path, &content).map(Some),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(ContentError::io(path, e)),
            }
        }

        Ok(None)
    }

    /// Read every source; each file succeeds or fails on its own
    pub fn read_all(&self) -> Vec<(PathBuf, Result<SourceFile, ContentError>)> {
        self.files()
            .into_iter()
            .map(|(slug, path)| {
                let result = fs::read_to_string(&path)
                    .map_err(|e| ContentError::io(&path, e))
                    .and_then(|content| parse_source(&slug, path.clone(), &content));
                (path, result)
            })
            .collect()
    }
}

fn parse_source(slug: &str, path: PathBuf, content: &str) -> Result<SourceFile, ContentError> {
    let (front_matter, body) = FrontMatter::parse(content)?;
    let modified = fs::metadata(&path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    tracing::debug!("Read post source {:?}", path);

    Ok(SourceFile {
        slug: slug.to_string(),
        front_matter,
        body: body.to_string(),
        modified,
        path,
    })
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e))
        .unwrap_or(false)
}
