//! Validate every post file

use anyhow::Result;
use std::path::PathBuf;

use crate::Folio;

/// Outcome of checking the content directory
#[derive(Debug)]
pub struct CheckReport {
    pub valid: usize,
    pub problems: Vec<(PathBuf, String)>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Collect the files that listings would leave out, and why
pub fn check(folio: &Folio) -> CheckReport {
    let scan = folio.repository().scan();
    CheckReport {
        valid: scan.posts.len(),
        problems: scan
            .failures
            .into_iter()
            .map(|(path, e)| (path, e.to_string()))
            .collect(),
    }
}

/// Print the report; fails when any post is malformed
pub fn run(folio: &Folio) -> Result<()> {
    let report = check(folio);

    println!("Valid posts: {}", report.valid);
    for (path, problem) in &report.problems {
        println!("  {}: {}", path.display(), problem);
    }

    if !report.is_ok() {
        anyhow::bail!("{} malformed post(s)", report.problems.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_check_reports_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        fs::create_dir_all(&folio.content_dir).unwrap();
        fs::write(folio.content_dir.join("ok.md"), "---\ntitle: Ok\n---\nx").unwrap();
        fs::write(folio.content_dir.join("untitled.md"), "---\ndate: 2024-01-01\n---\nx").unwrap();

        let report = check(&folio);
        assert_eq!(report.valid, 1);
        assert_eq!(report.problems.len(), 1);
        assert!(report.problems[0].0.ends_with("untitled.md"));
        assert!(run(&folio).is_err());
    }

    #[test]
    fn test_check_empty_site() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        let report = check(&folio);
        assert!(report.is_ok());
        assert_eq!(report.valid, 0);
    }
}
