pub mod agent;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod pacer;
pub mod plan;
pub mod record;
pub mod seen;

pub use crawler::{CrawlEvent, CrawlSummary, Crawler, ProgressCallback, RecordSink};
pub use error::ScanError;
pub use fetcher::{Fetcher, RetryPolicy};
pub use pacer::{Pacer, PauseRange};
pub use plan::{CrawlPlan, IndexQuery, ListingFilter};
pub use record::GpuRecord;
pub use seen::SeenSet;
