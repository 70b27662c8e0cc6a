//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a harvest
//! run: run metadata, counts, field coverage and the failed projects.

use crate::output::summary::{CrawlSummary, OutputResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of the run to `output_path`
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# SoftCon Harvest Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Listing**: {}\n", summary.listing_url));
    md.push_str(&format!("- **Mode**: {}\n", summary.mode));
    md.push_str(&format!("- **Category**: {}\n", summary.category));
    if let Some(term) = &summary.term {
        md.push_str(&format!("- **Term**: {}\n", term));
    }
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    let duration = summary.duration_seconds();
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        duration,
        duration as f64 / 60.0
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **References Discovered**: {}\n",
        summary.references_discovered
    ));
    md.push_str(&format!("- **Details Fetched**: {}\n", summary.details_selected));
    md.push_str(&format!("- **Succeeded**: {}\n", summary.details_succeeded));
    md.push_str(&format!("- **Failed**: {}\n", summary.details_failed));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        summary.success_rate()
    ));

    if summary.details_succeeded > 0 {
        md.push_str("## Field Coverage\n\n");
        md.push_str("| Field | Projects |\n");
        md.push_str("|-------|----------|\n");
        for (field, count) in &summary.field_coverage {
            md.push_str(&format!(
                "| {} | {}/{} |\n",
                field, count, summary.details_succeeded
            ));
        }
        md.push('\n');
    }

    if !summary.failures.is_empty() {
        md.push_str("## Failed Projects\n\n");
        md.push_str("| URL | Error |\n");
        md.push_str("|-----|-------|\n");
        for failure in &summary.failures {
            md.push_str(&format!(
                "| {} | {} |\n",
                failure.url,
                failure.error.replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    md
}
