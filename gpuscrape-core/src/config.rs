//! Compile-time defaults and the three scrape presets.

use crate::output::OutputMode;
use gpuscrape_scanner::agent::{USER_AGENTS, UserAgentMode};
use gpuscrape_scanner::plan::Igp;
use gpuscrape_scanner::{CrawlPlan, Fetcher, Pacer, PauseRange, RetryPolicy, ScanError};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

pub const BASE_URL: &str = "https://www.techpowerup.com";
pub const LIST_PATH: &str = "/gpu-specs/";
pub const CATALOG_SORT: &str = "name";

pub const CATALOG_CSV_FILE: &str = "gpu_data.csv";
pub const SWEEP_CSV_FILE: &str = "gpu_data_all.csv";

pub const ALL_BRANDS: [&str; 5] = ["NVIDIA", "AMD", "Intel", "ATI", "Apple"];
pub const SWEEP_YEARS: RangeInclusive<u16> = 1986..=2025;
pub const PERSISTENT_YEARS: RangeInclusive<u16> = 2002..=2024;
pub const IGP_OPTIONS: [Igp; 2] = [Igp::Yes, Igp::No];

pub const RETRY_DELAY_MULTIPLIER: f64 = 2.0;
pub const RATE_LIMIT_WAIT: Duration = Duration::from_secs(30);

/// Which of the original scraping scripts to behave like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Whole catalog sorted by name; skip anything that fails.
    Catalog,
    /// Every brand × year × IGP listing; wait out 429s.
    Sweep,
    /// NVIDIA listings with unbounded exponential backoff.
    Persistent,
}

impl Variant {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "catalog" => Some(Variant::Catalog),
            "sweep" => Some(Variant::Sweep),
            "persistent" => Some(Variant::Persistent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Catalog => "catalog",
            Variant::Sweep => "sweep",
            Variant::Persistent => "persistent",
        }
    }
}

/// How the user agent is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAgentRotation {
    /// One of the three classic agents, fixed for the run.
    PerProcess,
    /// Any agent of the full pool, redrawn for every request.
    PerRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanSpec {
    Catalog {
        sort: String,
    },
    Sweep {
        brands: Vec<String>,
        years: RangeInclusive<u16>,
        igp: Vec<Igp>,
    },
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub variant: Variant,
    pub base_url: String,
    pub list_path: String,
    pub plan: PlanSpec,
    pub output_path: PathBuf,
    pub output_mode: OutputMode,
    pub timeout_secs: u64,
    pub retry_policy: RetryPolicy,
    pub user_agent: UserAgentRotation,
    pub pacer: Pacer,
    pub show_progress: bool,
}

impl ScrapeConfig {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Catalog => Self {
                variant,
                base_url: BASE_URL.to_string(),
                list_path: LIST_PATH.to_string(),
                plan: PlanSpec::Catalog {
                    sort: CATALOG_SORT.to_string(),
                },
                output_path: PathBuf::from(CATALOG_CSV_FILE),
                output_mode: OutputMode::Truncate,
                timeout_secs: 10,
                retry_policy: RetryPolicy::FailFast,
                user_agent: UserAgentRotation::PerProcess,
                pacer: Pacer::new(
                    PauseRange::new(10.0, 20.0),
                    PauseRange::none(),
                    PauseRange::none(),
                ),
                show_progress: false,
            },
            Variant::Sweep => Self {
                variant,
                base_url: BASE_URL.to_string(),
                list_path: LIST_PATH.to_string(),
                plan: PlanSpec::Sweep {
                    brands: ALL_BRANDS.iter().map(|b| b.to_string()).collect(),
                    years: SWEEP_YEARS,
                    igp: IGP_OPTIONS.to_vec(),
                },
                output_path: PathBuf::from(SWEEP_CSV_FILE),
                output_mode: OutputMode::Append,
                timeout_secs: 10,
                retry_policy: RetryPolicy::WaitOn429 {
                    wait: RATE_LIMIT_WAIT,
                },
                user_agent: UserAgentRotation::PerProcess,
                pacer: Pacer::new(
                    PauseRange::new(10.0, 30.0),
                    PauseRange::new(10.0, 30.0),
                    PauseRange::new(10.0, 30.0),
                ),
                show_progress: false,
            },
            Variant::Persistent => Self {
                variant,
                base_url: BASE_URL.to_string(),
                list_path: LIST_PATH.to_string(),
                plan: PlanSpec::Sweep {
                    brands: vec![ALL_BRANDS[0].to_string()],
                    years: PERSISTENT_YEARS,
                    igp: IGP_OPTIONS.to_vec(),
                },
                output_path: PathBuf::from(SWEEP_CSV_FILE),
                output_mode: OutputMode::Append,
                timeout_secs: 15,
                retry_policy: RetryPolicy::backoff(
                    RETRY_DELAY_MULTIPLIER,
                    PauseRange::new(15.0, 45.0),
                ),
                user_agent: UserAgentRotation::PerRequest,
                pacer: Pacer::new(
                    PauseRange::new(15.0, 45.0),
                    PauseRange::new(20.0, 60.0),
                    PauseRange::none(),
                ),
                show_progress: false,
            },
        }
    }

    /// Caps the number of retries. Only backoff retries are counted.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        if let RetryPolicy::Backoff {
            ref mut max_retries,
            ..
        } = self.retry_policy
        {
            *max_retries = Some(max);
        }
        self
    }

    /// Narrows a sweep to the given brands. No effect on a catalog plan.
    pub fn with_brands(mut self, new_brands: Vec<String>) -> Self {
        if let PlanSpec::Sweep { ref mut brands, .. } = self.plan
            && !new_brands.is_empty()
        {
            *brands = new_brands;
        }
        self
    }

    pub fn with_years(mut self, from: Option<u16>, to: Option<u16>) -> Self {
        if let PlanSpec::Sweep { ref mut years, .. } = self.plan {
            let start = from.unwrap_or(*years.start());
            let end = to.unwrap_or(*years.end());
            *years = start..=end;
        }
        self
    }

    pub fn with_igp(mut self, options: Vec<Igp>) -> Self {
        if let PlanSpec::Sweep { ref mut igp, .. } = self.plan
            && !options.is_empty()
        {
            *igp = options;
        }
        self
    }

    pub fn build_plan(&self) -> Result<CrawlPlan, ScanError> {
        match &self.plan {
            PlanSpec::Catalog { sort } => CrawlPlan::catalog(&self.base_url, &self.list_path, sort),
            PlanSpec::Sweep { brands, years, igp } => CrawlPlan::sweep(
                &self.base_url,
                &self.list_path,
                brands,
                years.clone(),
                igp,
            ),
        }
    }

    pub fn build_fetcher(&self) -> Result<Fetcher, ScanError> {
        let user_agent = match self.user_agent {
            UserAgentRotation::PerProcess => UserAgentMode::per_process(&USER_AGENTS[..3]),
            UserAgentRotation::PerRequest => UserAgentMode::per_request(USER_AGENTS),
        };
        Ok(Fetcher::new(self.timeout_secs)?
            .with_policy(self.retry_policy.clone())
            .with_user_agent(user_agent))
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Persistent)
    }
}
