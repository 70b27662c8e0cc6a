//! Crawler coordinator - main crawl orchestration logic
//!
//! This module sequences one harvest run:
//! - Building the listing URL and discovering project references
//! - Capping the reference set to the configured maximum
//! - Fetching and extracting every selected detail page with pacing
//! - Isolating per-item failures so one bad page never aborts the batch

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::scheduler::{assign_lanes, Pacer};
use crate::extract::{discover, extract_detail};
use crate::model::{ProjectDetail, ProjectReference};
use crate::{ConfigError, HarvestError};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

/// Why a run ended before any detail page was requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// The listing page could not be fetched
    ListingUnavailable(String),
    /// The listing page contained no project references
    NoReferences,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListingUnavailable(cause) => write!(f, "listing unavailable: {}", cause),
            Self::NoReferences => write!(f, "no project references found"),
        }
    }
}

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub listing_url: String,

    /// Every reference discovered on the listing page
    pub references: Vec<ProjectReference>,

    /// One detail per selected reference, in reference order
    pub details: Vec<ProjectDetail>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Number of details that carry a failure
    pub fn failure_count(&self) -> usize {
        self.details.iter().filter(|d| d.is_failure()).count()
    }
}

/// Result of a harvest run
#[derive(Debug, Clone)]
pub enum CrawlOutcome {
    /// Discovery produced nothing to process; not an error
    NothingToProcess {
        listing_url: String,
        reason: EmptyReason,
    },
    Completed(CrawlReport),
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetcher>,
    listing_url: String,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - The listing URL cannot be built from the
    ///   configuration, or the HTTP client failed to build
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher))?)
    }

    /// Creates a coordinator with a caller-supplied fetcher
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, ConfigError> {
        let listing_url = config.crawl.listing_url(&config.site)?;
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            listing_url,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// Fetches the listing page and discovers project references
    ///
    /// # Returns
    ///
    /// * `Ok(references)` - At least one reference was found
    /// * `Err(EmptyReason)` - Nothing to process
    pub async fn discover(&self) -> Result<Vec<ProjectReference>, EmptyReason> {
        tracing::info!("Listing URL: {}", self.listing_url);

        let html = self.fetcher.fetch(&self.listing_url).await.map_err(|e| {
            tracing::warn!("Failed to fetch listing: {}", e);
            EmptyReason::ListingUnavailable(e.to_string())
        })?;

        let references = discover(&html, &self.config.site);
        if references.is_empty() {
            tracing::warn!("No project references found on {}", self.listing_url);
            return Err(EmptyReason::NoReferences);
        }

        tracing::info!("Found {} project references", references.len());
        Ok(references)
    }

    /// The prefix of `references` that this run will fetch
    pub fn select<'r>(&self, references: &'r [ProjectReference]) -> &'r [ProjectReference] {
        let limit = references.len().min(self.config.crawl.max_items);
        if limit < references.len() {
            tracing::info!(
                "Limiting detail pass to {} of {} references",
                limit,
                references.len()
            );
        }
        &references[..limit]
    }

    /// Fetches and extracts a detail record for every reference
    ///
    /// References are dealt round-robin to `crawl.workers` lanes. Each lane
    /// fetches sequentially, paced by `crawl.pacing-ms`. Results are placed
    /// back at their input index, so the output has exactly one entry per
    /// reference in input order regardless of completion order. Each item
    /// runs as its own task, so a fetch failure or a panic while fetching or
    /// extracting becomes a failure record for that item alone and the lane
    /// moves on to the next one.
    pub async fn harvest(&self, references: &[ProjectReference]) -> Vec<ProjectDetail> {
        let total = references.len();
        let pacing = Duration::from_millis(self.config.crawl.pacing_ms);
        let lanes = assign_lanes(total, self.config.crawl.workers);

        tracing::info!(
            "Fetching {} project details on {} lane(s), {}ms apart",
            total,
            lanes.len(),
            pacing.as_millis()
        );

        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, ProjectDetail)>();
        let mut join_set = JoinSet::new();

        for (lane_id, indices) in lanes.into_iter().enumerate() {
            let jobs: Vec<(usize, ProjectReference)> = indices
                .into_iter()
                .map(|index| (index, references[index].clone()))
                .collect();
            let fetcher = Arc::clone(&self.fetcher);
            let config = Arc::clone(&self.config);
            let tx = tx.clone();

            join_set.spawn(async move {
                let mut pacer = Pacer::new(pacing);
                for (index, reference) in jobs {
                    pacer.wait().await;
                    tracing::info!(
                        "Project {}/{} (lane {}): {}",
                        index + 1,
                        total,
                        lane_id,
                        reference.title
                    );
                    let item = tokio::spawn(fetch_detail(
                        Arc::clone(&fetcher),
                        Arc::clone(&config),
                        reference.clone(),
                    ));
                    let detail = match item.await {
                        Ok(detail) => detail,
                        Err(e) => {
                            let cause = aborted_cause(e);
                            tracing::error!("Project {} aborted: {}", reference.url, cause);
                            ProjectDetail::failed(&reference.url, cause)
                        }
                    };
                    if tx.send((index, detail)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut slots: Vec<Option<ProjectDetail>> = vec![None; total];
        while let Some((index, detail)) = rx.recv().await {
            slots[index] = Some(detail);
        }

        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker lane aborted: {}", e);
            }
        }

        slots
            .into_iter()
            .zip(references)
            .map(|(slot, reference)| {
                slot.unwrap_or_else(|| {
                    ProjectDetail::failed(
                        &reference.url,
                        "worker lane aborted before this project was processed",
                    )
                })
            })
            .collect()
    }

    /// Runs discovery and the detail pass
    ///
    /// This never fails once the coordinator exists: an unreachable or empty
    /// listing is reported as [`CrawlOutcome::NothingToProcess`], and detail
    /// failures are recorded inside the report.
    pub async fn run(&self) -> CrawlOutcome {
        let started_at = Utc::now();

        let references = match self.discover().await {
            Ok(references) => references,
            Err(reason) => {
                return CrawlOutcome::NothingToProcess {
                    listing_url: self.listing_url.clone(),
                    reason,
                }
            }
        };

        CrawlOutcome::Completed(self.complete(references, started_at).await)
    }

    /// Runs the detail pass over already-discovered references
    ///
    /// Callers that persist references between discovery and the detail
    /// pass use this instead of [`Coordinator::run`].
    pub async fn complete(
        &self,
        references: Vec<ProjectReference>,
        started_at: DateTime<Utc>,
    ) -> CrawlReport {
        let details = self.harvest(self.select(&references)).await;

        let report = CrawlReport {
            listing_url: self.listing_url.clone(),
            references,
            details,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl completed: {} details ({} failed) in {}s",
            report.details.len(),
            report.failure_count(),
            (report.finished_at - report.started_at).num_seconds()
        );

        report
    }
}

/// Fetches one detail page, converting any failure into a failure record
async fn fetch_detail(
    fetcher: Arc<dyn Fetcher>,
    config: Arc<Config>,
    reference: ProjectReference,
) -> ProjectDetail {
    match fetcher.fetch(&reference.url).await {
        Ok(html) => extract_detail(&html, &reference.url, &config.site),
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", reference.url, e);
            ProjectDetail::failed(&reference.url, e)
        }
    }
}

/// Describes why a per-item task ended without a record
fn aborted_cause(error: JoinError) -> String {
    if !error.is_panic() {
        return format!("extraction cancelled: {}", error);
    }
    let payload = error.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("extraction panicked: {}", message)
}

/// Runs a complete harvest with the HTTP fetcher
///
/// # Example
///
/// ```no_run
/// use softcon_harvest::config::load_config;
/// use softcon_harvest::crawler::{run_crawl, CrawlOutcome};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// if let CrawlOutcome::Completed(report) = run_crawl(config).await? {
///     println!("{} details", report.details.len());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
