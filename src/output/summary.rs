//! Run summary types and output errors

use crate::config::Config;
use crate::crawler::CrawlReport;
use crate::model::ProjectDetail;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A detail page that ended as a failure record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedProject {
    pub url: String,
    pub error: String,
}

/// Summary statistics for a harvest run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Run metadata
    pub listing_url: String,
    pub mode: String,
    pub category: String,
    pub term: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: String,

    // Counts
    pub references_discovered: usize,
    pub details_selected: usize,
    pub details_succeeded: usize,
    pub details_failed: usize,

    /// How many successful details carry each field (field name -> count)
    pub field_coverage: Vec<(&'static str, usize)>,

    pub failures: Vec<FailedProject>,
}

type FieldProbe = fn(&ProjectDetail) -> bool;

const COVERAGE_FIELDS: [(&str, FieldProbe); 12] = [
    ("title", |d| d.title.is_some()),
    ("summary", |d| d.summary.is_some()),
    ("description", |d| d.description.is_some()),
    ("registrant", |d| {
        d.team_info.as_ref().map_or(false, |t| t.registrant.is_some())
    }),
    ("members", |d| {
        d.team_info.as_ref().map_or(false, |t| !t.members.is_empty())
    }),
    ("mentor", |d| d.team_info.as_ref().map_or(false, |t| t.mentor.is_some())),
    ("gitRepository", |d| d.git_repository.is_some()),
    ("presentationUrl", |d| d.presentation_url.is_some()),
    ("videoUrl", |d| d.video_url.is_some()),
    ("representativeImage", |d| d.representative_image.is_some()),
    ("likeCount", |d| d.like_count.is_some()),
    ("commentCount", |d| d.comment_count.is_some()),
];

impl CrawlSummary {
    /// Builds a summary from a completed run
    pub fn from_report(report: &CrawlReport, config: &Config, config_hash: &str) -> Self {
        let (failed, succeeded): (Vec<&ProjectDetail>, Vec<&ProjectDetail>) =
            report.details.iter().partition(|d| d.is_failure());

        let field_coverage = COVERAGE_FIELDS
            .iter()
            .map(|(name, has_field)| (*name, succeeded.iter().filter(|d| has_field(**d)).count()))
            .collect();

        let failures = failed
            .iter()
            .map(|d| FailedProject {
                url: d.url.clone(),
                error: d.error.clone().unwrap_or_default(),
            })
            .collect();

        Self {
            listing_url: report.listing_url.clone(),
            mode: config.crawl.mode.to_string(),
            category: config.crawl.category.to_string(),
            term: config.crawl.term.clone(),
            started_at: report.started_at,
            finished_at: report.finished_at,
            config_hash: config_hash.to_string(),
            references_discovered: report.references.len(),
            details_selected: report.details.len(),
            details_succeeded: succeeded.len(),
            details_failed: failed.len(),
            field_coverage,
            failures,
        }
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.details_selected == 0 {
            return 0.0;
        }
        (self.details_succeeded as f64 / self.details_selected as f64) * 100.0
    }

    /// Returns the failure rate as a percentage
    pub fn failure_rate(&self) -> f64 {
        if self.details_selected == 0 {
            return 0.0;
        }
        (self.details_failed as f64 / self.details_selected as f64) * 100.0
    }
}
