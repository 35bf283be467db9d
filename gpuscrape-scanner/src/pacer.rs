use rand::{Rng, rng};
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// Uniform range of seconds to wait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauseRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl PauseRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    pub const fn none() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.max_secs <= 0.0
    }

    pub fn sample(&self) -> Duration {
        if self.is_zero() {
            return Duration::ZERO;
        }
        let (lo, hi) = if self.min_secs <= self.max_secs {
            (self.min_secs.max(0.0), self.max_secs)
        } else {
            (self.max_secs.max(0.0), self.min_secs)
        };
        let secs = if lo == hi {
            lo
        } else {
            rng().random_range(lo..=hi)
        };
        Duration::from_secs_f64(secs)
    }
}

/// Where in the crawl a pause happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseKind {
    /// After each scraped detail page.
    Detail,
    /// After each index page, before the next page number.
    Index,
    /// After an index page that listed nothing.
    NoResults,
}

/// Throttles the crawl with randomized sleeps between fetches.
#[derive(Debug, Clone)]
pub struct Pacer {
    pub detail: PauseRange,
    pub index: PauseRange,
    pub no_results: PauseRange,
}

impl Pacer {
    pub fn new(detail: PauseRange, index: PauseRange, no_results: PauseRange) -> Self {
        Self {
            detail,
            index,
            no_results,
        }
    }

    /// No waiting at all. Meant for tests and local mirrors.
    pub fn disabled() -> Self {
        Self::new(PauseRange::none(), PauseRange::none(), PauseRange::none())
    }

    fn range(&self, kind: PauseKind) -> PauseRange {
        match kind {
            PauseKind::Detail => self.detail,
            PauseKind::Index => self.index,
            PauseKind::NoResults => self.no_results,
        }
    }

    /// Sleeps for a random duration from the range configured for `kind`.
    /// Returns the time slept.
    pub async fn pause(&self, kind: PauseKind) -> Duration {
        let delay = self.range(kind).sample();
        if delay.is_zero() {
            return delay;
        }
        match kind {
            PauseKind::Detail => info!("Sleeping {:.1}s...", delay.as_secs_f64()),
            PauseKind::Index => info!(
                "Sleeping {:.1}s before next page...",
                delay.as_secs_f64()
            ),
            PauseKind::NoResults => info!(
                "No results found. Sleeping for {:.1}s",
                delay.as_secs_f64()
            ),
        }
        sleep(delay).await;
        delay
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::disabled()
    }
}
