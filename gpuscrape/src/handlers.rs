use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use gpuscrape_core::config::{PlanSpec, ScrapeConfig, Variant};
use gpuscrape_core::output::row_writer;
use gpuscrape_core::{execute_scrape, generate_scrape_report, plan_urls};
use gpuscrape_scanner::extract::parse_detail;
use gpuscrape_scanner::plan::Igp;
use gpuscrape_scanner::RetryPolicy;
use gpuscrape_scanner::record::{CSV_HEADER, GpuRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use url::Url;

pub fn print_banner() {
    println!(
        "{} {}",
        "gpuscrape".bright_green().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", "GPU spec listings -> CSV".dimmed());
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

/// Default log level for the `-q` / `-v` flags.
pub fn log_level(quiet: bool, verbosity: u8) -> &'static str {
    match (quiet, verbosity) {
        (true, 0) => "warn",
        (_, 0) => "info",
        (_, 1) => "debug",
        _ => "trace",
    }
}

/// Install the fmt subscriber. `RUST_LOG` wins over the flags.
pub fn init_logging(quiet: bool, verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(quiet, verbosity)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Maps the `--igp` flag to the filter values to crawl.
pub fn parse_igp_option(value: &str) -> anyhow::Result<Vec<Igp>> {
    if value.eq_ignore_ascii_case("both") {
        return Ok(vec![Igp::Yes, Igp::No]);
    }
    match Igp::from_str(value) {
        Some(igp) => Ok(vec![igp]),
        None => bail!("Invalid IGP filter '{}': expected yes, no or both", value),
    }
}

/// Expands `~` and turns the result into a path.
pub fn expand_output_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Start from the chosen preset and apply every override given on the command line.
///
/// Only reads the flags the subcommand defines, so it works for both `scrape`
/// and `plan`.
pub fn build_config_from_args(args: &ArgMatches) -> anyhow::Result<ScrapeConfig> {
    let variant_name = args
        .get_one::<String>("variant")
        .map(String::as_str)
        .unwrap_or("persistent");
    let variant = Variant::from_str(variant_name)
        .with_context(|| format!("Unknown variant '{}'", variant_name))?;

    let brands: Vec<String> = args
        .get_many::<String>("brand")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let igp = match args.get_one::<String>("igp") {
        Some(value) => parse_igp_option(value)?,
        None => Vec::new(),
    };
    let from_year = args.get_one::<u16>("from-year").copied();
    let to_year = args.get_one::<u16>("to-year").copied();

    let mut config = ScrapeConfig::for_variant(variant)
        .with_brands(brands)
        .with_years(from_year, to_year)
        .with_igp(igp);

    // a single year flag is merged with the preset bound
    if let PlanSpec::Sweep { years, .. } = &config.plan
        && years.start() > years.end()
    {
        bail!(
            "Year range {}-{} is empty (check --from-year / --to-year)",
            years.start(),
            years.end()
        );
    }

    if let Some(base_url) = args.get_one::<Url>("base-url") {
        config.base_url = base_url.to_string();
    }

    // scrape-only flags; `plan` does not define them
    if let Ok(Some(output)) = args.try_get_one::<String>("output") {
        config.output_path = expand_output_path(output);
    }
    if let Ok(Some(timeout)) = args.try_get_one::<u64>("timeout") {
        config.timeout_secs = *timeout;
    }
    if let Ok(Some(max)) = args.try_get_one::<u32>("max-retries") {
        if !matches!(config.retry_policy, RetryPolicy::Backoff { .. }) {
            warn!("--max-retries only applies to the persistent variant, ignoring it");
        }
        config = config.with_max_retries(*max);
    }

    Ok(config)
}

/// Describe the plan part of a config in one line.
pub fn describe_plan(config: &ScrapeConfig) -> String {
    match &config.plan {
        PlanSpec::Catalog { sort } => format!("full catalog sorted by {}", sort),
        PlanSpec::Sweep { brands, years, igp } => {
            let igp: Vec<&str> = igp.iter().map(|i| i.as_str()).collect();
            format!(
                "{} | {}-{} | IGP: {}",
                brands.join(", "),
                years.start(),
                years.end(),
                igp.join("/")
            )
        }
    }
}

pub async fn handle_scrape(sub_matches: &ArgMatches) {
    let quiet = sub_matches.get_flag("quiet");

    let mut config = match build_config_from_args(sub_matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    };
    config.show_progress = !quiet;

    if !quiet {
        print_divider();
        println!("{} {}", "Variant:".bold(), config.variant.as_str());
        println!("{} {}", "Plan:".bold(), describe_plan(&config));
        println!(
            "{} {} ({})",
            "Output:".bold(),
            config.output_path.display(),
            config.output_mode.as_str()
        );
        println!("{} {}s", "Timeout:".bold(), config.timeout_secs);
        print_divider();
    }

    let progress_callback = Arc::new(move |msg: String| {
        if !quiet {
            println!("{}", msg);
        }
    });

    let outcome = match execute_scrape(&config, Some(progress_callback)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("✗ Scrape failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n{} Scrape complete!\n", "✓".green().bold());
    print!("{}", generate_scrape_report(&outcome));
}

pub fn handle_plan(sub_matches: &ArgMatches) {
    let urls = build_config_from_args(sub_matches)
        .and_then(|config| plan_urls(&config).map_err(anyhow::Error::from));

    match urls {
        Ok(urls) => {
            for url in &urls {
                println!("{}", url);
            }
            if !sub_matches.get_flag("quiet") {
                eprintln!("{} segment(s)", urls.len());
            }
        }
        Err(e) => {
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Run the detail parser over a saved page.
pub fn parse_detail_file(path: &Path) -> anyhow::Result<GpuRecord> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_detail(&html))
}

/// Render a record as CSV text, optionally preceded by the header row.
pub fn record_to_csv(record: &GpuRecord, with_header: bool) -> anyhow::Result<String> {
    let mut writer = row_writer(Vec::new());
    if with_header {
        writer.write_record(CSV_HEADER)?;
    }
    writer.serialize(record)?;
    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    Ok(String::from_utf8(bytes)?)
}

pub fn handle_parse(sub_matches: &ArgMatches) {
    let Some(path) = sub_matches.get_one::<PathBuf>("FILE") else {
        eprintln!("✗ No file given");
        std::process::exit(1);
    };
    let quiet = sub_matches.get_flag("quiet");

    let output = parse_detail_file(path).and_then(|record| {
        if !quiet && !record.is_complete() {
            eprintln!("{} some fields were not found on the page", "⚠".yellow());
        }
        record_to_csv(&record, !quiet)
    });

    match output {
        Ok(csv) => print!("{}", csv),
        Err(e) => {
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    }
}
