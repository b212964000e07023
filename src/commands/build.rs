//! Build the public directory

use anyhow::Result;

use crate::generator::{BuildReport, Generator};
use crate::Folio;

/// Precompute every post and write the site documents
pub fn run(folio: &Folio) -> Result<BuildReport> {
    let report = Generator::new(folio).generate()?;

    for path in &report.skipped {
        tracing::warn!("Left out malformed post: {:?}", path);
    }
    tracing::info!(
        "Built {} posts ({} skipped) in {:?}",
        report.posts,
        report.skipped.len(),
        report.elapsed
    );

    Ok(report)
}
