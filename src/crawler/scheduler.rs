//! Request pacing and work distribution
//!
//! This module handles:
//! - Minimum spacing between consecutive requests on one worker lane
//! - Round-robin assignment of references to a bounded number of lanes

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Enforces a minimum delay between consecutive requests
///
/// The first call to [`Pacer::wait`] returns immediately; every later call
/// waits until `interval` has passed since the previous one returned. No
/// delay is ever spent after the final request of a lane.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last_request: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: None,
        }
    }

    /// Waits until the next request may be issued, then records it
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let ready_at = last + self.interval;
            if Instant::now() < ready_at {
                tracing::trace!("Pacing for {:?}", ready_at - Instant::now());
                sleep_until(ready_at).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// Splits item indices `0..len` across `workers` lanes, round-robin
///
/// Lane `k` receives indices `k, k + workers, k + 2 * workers, ...` in
/// ascending order. Empty lanes are not returned.
pub fn assign_lanes(len: usize, workers: usize) -> Vec<Vec<usize>> {
    let workers = workers.max(1).min(len.max(1));
    let mut lanes = vec![Vec::new(); workers];
    for index in 0..len {
        lanes[index % workers].push(index);
    }
    lanes.retain(|lane| !lane.is_empty());
    lanes
}
