pub mod config;
pub mod output;
pub mod report;
pub mod scrape;

pub use config::{ScrapeConfig, Variant};
pub use output::{CsvSink, OutputError, OutputMode};
pub use report::generate_scrape_report;
pub use scrape::{ScrapeError, ScrapeOutcome, ScrapeProgressCallback, execute_scrape, plan_urls};
