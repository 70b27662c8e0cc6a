//! Crawler module for page fetching and run orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - Request pacing and lane assignment
//! - Overall crawl coordination with per-item failure isolation
//!
//! [`run_crawl`] is the one-call entry point.

mod coordinator;
mod fetcher;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome, CrawlReport, EmptyReason};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use scheduler::{assign_lanes, Pacer};

