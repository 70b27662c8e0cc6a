//! Console statistics for a finished run
//!
//! This module renders a [`CrawlSummary`] as plain text for the terminal.

use crate::output::summary::CrawlSummary;

/// Prints statistics to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_statistics(summary));
}

/// Formats the console statistics block
pub fn format_statistics(summary: &CrawlSummary) -> String {
    let mut out = String::from("=== Harvest Statistics ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Listing: {}\n", summary.listing_url));
    out.push_str(&format!(
        "  References discovered: {}\n",
        summary.references_discovered
    ));
    out.push_str(&format!("  Details fetched: {}\n", summary.details_selected));
    out.push_str(&format!("  Duration: {}s\n\n", summary.duration_seconds()));

    if summary.details_succeeded > 0 {
        out.push_str("Field Coverage:\n");
        // Sort fields by count (descending)
        let mut coverage: Vec<_> = summary.field_coverage.iter().collect();
        coverage.sort_by(|a, b| b.1.cmp(&a.1));

        for (field, count) in coverage {
            let percentage = (*count as f64 / summary.details_succeeded as f64) * 100.0;
            out.push_str(&format!("  {}: {} ({:.1}%)\n", field, count, percentage));
        }
        out.push('\n');
    }

    if !summary.failures.is_empty() {
        out.push_str(&format!("Failed Projects ({}):\n", summary.failures.len()));
        for failure in &summary.failures {
            out.push_str(&format!("  - {}: {}\n", failure.url, failure.error));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} projects extracted)\n",
        summary.success_rate(),
        summary.details_succeeded,
        summary.details_selected
    ));

    out
}
