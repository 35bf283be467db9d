use crate::error::Result;
use crate::extract::{extract_links, parse_detail};
use crate::fetcher::Fetcher;
use crate::pacer::{PauseKind, Pacer};
use crate::plan::{CrawlPlan, IndexQuery};
use crate::record::GpuRecord;
use crate::seen::SeenSet;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(&CrawlEvent) + Send + Sync>;

/// Destination for extracted records. A failed write is logged and counted by
/// the crawler; it never stops the crawl.
pub trait RecordSink {
    type Error: fmt::Display;

    fn write_record(&mut self, record: &GpuRecord) -> std::result::Result<(), Self::Error>;
}

impl RecordSink for Vec<GpuRecord> {
    type Error = Infallible;

    fn write_record(&mut self, record: &GpuRecord) -> std::result::Result<(), Self::Error> {
        self.push(record.clone());
        Ok(())
    }
}

/// Why pagination of a segment stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The index page was abandoned by the fetcher.
    FetchFailed,
    /// The index page listed no detail links.
    NoLinks,
    /// Every listed link had been visited already.
    AllSeen,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::FetchFailed => "index page could not be fetched",
            StopReason::NoLinks => "no results",
            StopReason::AllSeen => "all links already processed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub enum CrawlEvent {
    SegmentStarted {
        index: usize,
        total: usize,
        query: IndexQuery,
    },
    IndexFetched {
        url: String,
        page: usize,
        links: usize,
        new_links: usize,
    },
    RecordWritten(GpuRecord),
    DetailSkipped {
        url: String,
    },
    WriteFailed {
        url: String,
        reason: String,
    },
    SegmentFinished {
        query: IndexQuery,
        pages: usize,
        reason: StopReason,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub segments: usize,
    pub index_pages: usize,
    pub detail_pages: usize,
    pub records_written: usize,
    pub details_skipped: usize,
    pub write_failures: usize,
}

/// Sequential crawler: walks every segment of a plan page by page, scrapes each
/// unseen detail page and hands the record to a sink.
pub struct Crawler {
    fetcher: Fetcher,
    pacer: Pacer,
    seen: SeenSet,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            pacer: Pacer::default(),
            seen: SeenSet::new(),
            progress_callback: None,
        }
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(ref callback) = self.progress_callback {
            callback(&event);
        }
    }

    pub async fn crawl<S: RecordSink>(
        &mut self,
        plan: &CrawlPlan,
        sink: &mut S,
    ) -> Result<CrawlSummary> {
        let total = plan.segments().len();
        info!("Starting crawl of {} with {} segment(s)", plan.base_url(), total);

        let mut summary = CrawlSummary::default();
        for (idx, query) in plan.segments().iter().enumerate() {
            info!("=== {} ===", query);
            self.emit(CrawlEvent::SegmentStarted {
                index: idx,
                total,
                query: query.clone(),
            });

            let (pages, reason) = self.crawl_segment(plan, query, sink, &mut summary).await?;
            debug!("Segment {} stopped after {} page(s): {}", query, pages, reason);
            summary.segments += 1;

            self.emit(CrawlEvent::SegmentFinished {
                query: query.clone(),
                pages,
                reason,
            });
        }

        info!(
            "Crawl complete. {} records written from {} detail pages",
            summary.records_written, summary.detail_pages
        );
        Ok(summary)
    }

    /// Paginates one query from page 1. Returns the number of index pages
    /// requested and why it stopped.
    async fn crawl_segment<S: RecordSink>(
        &mut self,
        plan: &CrawlPlan,
        query: &IndexQuery,
        sink: &mut S,
        summary: &mut CrawlSummary,
    ) -> Result<(usize, StopReason)> {
        let mut page = 1usize;

        loop {
            let index_url = plan.index_url(query, page)?;
            info!("Fetching index: {}", index_url);

            let html = match self.fetcher.fetch(index_url.as_str()).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Failed to fetch index page {}: {}", index_url, e);
                    return Ok((page, StopReason::FetchFailed));
                }
            };
            summary.index_pages += 1;

            let links = extract_links(&html);
            let fresh = self.seen.unseen(&links);
            self.emit(CrawlEvent::IndexFetched {
                url: index_url.to_string(),
                page,
                links: links.len(),
                new_links: fresh.len(),
            });

            if links.is_empty() {
                info!("No results found on page {}", page);
                self.pacer.pause(PauseKind::NoResults).await;
                return Ok((page, StopReason::NoLinks));
            }
            if fresh.is_empty() {
                info!("All links already processed");
                return Ok((page, StopReason::AllSeen));
            }

            for path in fresh {
                self.seen.insert(&path);
                let detail_url = plan.detail_url(&path)?;
                info!("Scraping: {}", detail_url);

                let html = match self.fetcher.fetch(detail_url.as_str()).await {
                    Ok(html) if !html.is_empty() => html,
                    Ok(_) | Err(_) => {
                        warn!("Failed to fetch GPU details page {}. Skipping.", detail_url);
                        summary.details_skipped += 1;
                        self.emit(CrawlEvent::DetailSkipped {
                            url: detail_url.to_string(),
                        });
                        continue;
                    }
                };
                summary.detail_pages += 1;

                let record = parse_detail(&html);
                match sink.write_record(&record) {
                    Ok(()) => {
                        summary.records_written += 1;
                        info!(
                            "{} | {} | {}",
                            record.name, record.transistors, record.release_date
                        );
                        self.emit(CrawlEvent::RecordWritten(record));
                    }
                    Err(e) => {
                        summary.write_failures += 1;
                        warn!("Failed to write record for {}: {}", detail_url, e);
                        self.emit(CrawlEvent::WriteFailed {
                            url: detail_url.to_string(),
                            reason: e.to_string(),
                        });
                    }
                }

                self.pacer.pause(PauseKind::Detail).await;
            }

            self.pacer.pause(PauseKind::Index).await;
            page += 1;
        }
    }
}
