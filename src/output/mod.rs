//! Output module for persisting harvest results and run summaries
//!
//! This module handles:
//! - Writing the reference and detail collections as pretty JSON
//! - Building a [`CrawlSummary`] from a finished run
//! - Rendering the summary as markdown and as console statistics

mod json;
mod markdown;
pub mod stats;
mod summary;

pub use json::{write_details, write_json, write_references};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{format_statistics, print_summary};
pub use summary::{CrawlSummary, FailedProject, OutputError, OutputResult};

use crate::config::Config;
use crate::crawler::CrawlReport;
use crate::HarvestError;

/// Writes every artifact of a completed run
///
/// The details collection and the markdown summary are written to the
/// configured output directory. The references collection is expected to
/// have been written already, right after discovery.
///
/// # Arguments
///
/// * `report` - The completed run
/// * `config` - The effective configuration
/// * `config_hash` - Hash of `config`, recorded in the summary
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Everything was written
/// * `Err(HarvestError)` - A file could not be written
pub fn write_report(
    report: &CrawlReport,
    config: &Config,
    config_hash: &str,
) -> Result<CrawlSummary, HarvestError> {
    let details_path = config.output.details_path();
    write_details(&report.details, &details_path)?;
    tracing::info!(
        "Wrote {} details to {}",
        report.details.len(),
        details_path.display()
    );

    let summary = CrawlSummary::from_report(report, config, config_hash);
    let summary_path = config.output.summary_path();
    generate_markdown_summary(&summary, &summary_path)?;
    tracing::info!("Wrote run summary to {}", summary_path.display());

    Ok(summary)
}
