use crate::config::ScrapeConfig;
use crate::output::{CsvSink, OutputError};
use gpuscrape_scanner::{CrawlEvent, CrawlSummary, Crawler, ProgressCallback, ScanError};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Callback for reporting scrape progress as human-readable lines
pub type ScrapeProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub summary: CrawlSummary,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// Index URLs (page 1 of every segment) a scrape with `config` would start
/// from, in visiting order. No network access.
pub fn plan_urls(config: &ScrapeConfig) -> Result<Vec<String>, ScanError> {
    let plan = config.build_plan()?;
    plan.segments()
        .iter()
        .map(|query| plan.index_url(query, 1).map(|u| u.to_string()))
        .collect()
}

/// Run a full scrape with the given configuration.
///
/// Fails only if the plan or output file cannot be set up; everything that
/// goes wrong during the crawl is logged and counted in the summary.
pub async fn execute_scrape(
    config: &ScrapeConfig,
    progress_callback: Option<ScrapeProgressCallback>,
) -> Result<ScrapeOutcome, ScrapeError> {
    let plan = config.build_plan()?;
    let fetcher = config.build_fetcher()?;
    let mut sink = CsvSink::open(&config.output_path, config.output_mode)?;

    info!(
        "Writing to {} ({})",
        config.output_path.display(),
        config.output_mode.as_str()
    );

    // Single spinner for overall progress (only if enabled)
    let progress_bar = if config.show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_message("Starting scrape...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let written = Arc::new(AtomicUsize::new(0));
    let written_clone = written.clone();
    let pb_clone = progress_bar.clone();
    let outer = progress_callback.clone();

    let internal_callback: ProgressCallback = Arc::new(move |event: &CrawlEvent| {
        let message = match event {
            CrawlEvent::SegmentStarted {
                index,
                total,
                query,
            } => {
                let line = format!("Segment {}/{}: {}", index + 1, total, query);
                if let Some(ref cb) = outer {
                    cb(line.clone());
                }
                Some(line)
            }
            CrawlEvent::IndexFetched {
                page,
                links,
                new_links,
                ..
            } => Some(format!(
                "Page {}: {} links, {} new ({} records so far)",
                page,
                links,
                new_links,
                written_clone.load(Ordering::Relaxed)
            )),
            CrawlEvent::RecordWritten(record) => {
                let count = written_clone.fetch_add(1, Ordering::Relaxed) + 1;
                Some(format!("{} records written - last: {}", count, record.name))
            }
            CrawlEvent::WriteFailed { url, reason } => {
                if let Some(ref cb) = outer {
                    cb(format!("[!] Failed to write {}: {}", url, reason));
                }
                None
            }
            CrawlEvent::DetailSkipped { .. } | CrawlEvent::SegmentFinished { .. } => None,
        };

        if let (Some(pb), Some(msg)) = (&pb_clone, message) {
            pb.set_message(msg);
        }
    });

    let mut crawler = Crawler::new(fetcher)
        .with_pacer(config.pacer.clone())
        .with_progress_callback(internal_callback);

    let started = Instant::now();
    let result = crawler.crawl(&plan, &mut sink).await;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    let summary = result?;
    Ok(ScrapeOutcome {
        summary,
        output_path: sink.path().to_path_buf(),
        elapsed: started.elapsed(),
    })
}
