use gpuscrape::handlers::*;
use gpuscrape::command_argument_builder;
use gpuscrape_core::OutputMode;
use gpuscrape_core::config::{PlanSpec, Variant};
use gpuscrape_scanner::RetryPolicy;
use gpuscrape_scanner::plan::Igp;
use gpuscrape_scanner::record::GpuRecord;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["gpuscrape"];
    argv.extend_from_slice(args);
    let matches = command_argument_builder()
        .try_get_matches_from(argv)
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    sub.clone()
}

#[test]
fn test_parse_igp_option() {
    assert_eq!(parse_igp_option("yes").unwrap(), vec![Igp::Yes]);
    assert_eq!(parse_igp_option("No").unwrap(), vec![Igp::No]);
    assert_eq!(parse_igp_option("both").unwrap(), vec![Igp::Yes, Igp::No]);
    assert!(parse_igp_option("sometimes").is_err());
}

#[test]
fn test_log_level_follows_flags() {
    assert_eq!(log_level(true, 0), "warn");
    assert_eq!(log_level(false, 0), "info");
    assert_eq!(log_level(false, 1), "debug");
    assert_eq!(log_level(true, 1), "debug");
    assert_eq!(log_level(false, 3), "trace");
}

#[test]
fn test_default_scrape_is_persistent() {
    let config = build_config_from_args(&sub_matches(&["scrape"])).unwrap();
    assert_eq!(config.variant, Variant::Persistent);
    assert_eq!(config.output_path, PathBuf::from("gpu_data_all.csv"));
    assert_eq!(config.output_mode, OutputMode::Append);
    assert_eq!(config.timeout_secs, 15);
}

#[test]
fn test_scrape_overrides() {
    let config = build_config_from_args(&sub_matches(&[
        "scrape",
        "--variant",
        "sweep",
        "--brand",
        "AMD",
        "--brand",
        "Intel",
        "--from-year",
        "2010",
        "--to-year",
        "2012",
        "--igp",
        "no",
        "--timeout",
        "3",
        "-o",
        "out.csv",
        "--base-url",
        "http://127.0.0.1:8080",
    ]))
    .unwrap();

    assert_eq!(config.variant, Variant::Sweep);
    assert_eq!(
        config.plan,
        PlanSpec::Sweep {
            brands: vec!["AMD".to_string(), "Intel".to_string()],
            years: 2010..=2012,
            igp: vec![Igp::No],
        }
    );
    assert_eq!(config.timeout_secs, 3);
    assert_eq!(config.output_path, PathBuf::from("out.csv"));
    assert_eq!(config.base_url, "http://127.0.0.1:8080/");
}

#[test]
fn test_output_path_tilde_is_expanded() {
    let config = build_config_from_args(&sub_matches(&["scrape", "-o", "~/gpus.csv"])).unwrap();
    assert!(config.output_path.ends_with("gpus.csv"));
    if let Ok(home) = std::env::var("HOME") {
        assert_eq!(config.output_path, PathBuf::from(home).join("gpus.csv"));
    }
}

#[test]
fn test_max_retries_caps_backoff() {
    let config =
        build_config_from_args(&sub_matches(&["scrape", "--max-retries", "7"])).unwrap();
    assert!(matches!(
        config.retry_policy,
        RetryPolicy::Backoff {
            max_retries: Some(7),
            ..
        }
    ));
}

#[test]
fn test_max_retries_ignored_for_catalog() {
    let config = build_config_from_args(&sub_matches(&[
        "scrape",
        "--variant",
        "catalog",
        "--max-retries",
        "7",
    ]))
    .unwrap();
    assert!(matches!(config.retry_policy, RetryPolicy::FailFast));
}

#[test]
fn test_reversed_years_are_rejected() {
    let result = build_config_from_args(&sub_matches(&[
        "plan",
        "--from-year",
        "2020",
        "--to-year",
        "2010",
    ]));
    assert!(result.is_err());
}

#[test]
fn test_single_year_past_preset_end_is_rejected() {
    // persistent preset ends at 2024
    let err = build_config_from_args(&sub_matches(&["plan", "--from-year", "2030"])).unwrap_err();
    assert!(err.to_string().contains("2030-2024"));
}

#[test]
fn test_single_year_before_preset_start_is_rejected() {
    let result = build_config_from_args(&sub_matches(&[
        "scrape",
        "--variant",
        "sweep",
        "--to-year",
        "1980",
    ]));
    assert!(result.is_err());
}

#[test]
fn test_single_year_within_preset_is_accepted() {
    let config = build_config_from_args(&sub_matches(&["plan", "--from-year", "2024"])).unwrap();
    // NVIDIA × 2024 × Yes/No
    assert_eq!(gpuscrape::plan_urls(&config).unwrap().len(), 2);
}

#[test]
fn test_plan_config_ignores_scrape_only_flags() {
    let config = build_config_from_args(&sub_matches(&["plan", "--variant", "catalog"])).unwrap();
    assert_eq!(config.variant, Variant::Catalog);
    assert_eq!(config.output_path, PathBuf::from("gpu_data.csv"));
    assert_eq!(
        gpuscrape::plan_urls(&config).unwrap(),
        vec!["https://www.techpowerup.com/gpu-specs/?sort=name&page=1"]
    );
}

#[test]
fn test_describe_plan() {
    let config = build_config_from_args(&sub_matches(&[
        "plan", "--brand", "NVIDIA", "--igp", "both",
    ]))
    .unwrap();
    assert_eq!(describe_plan(&config), "NVIDIA | 2002-2024 | IGP: Yes/No");

    let config = build_config_from_args(&sub_matches(&["plan", "--variant", "catalog"])).unwrap();
    assert_eq!(describe_plan(&config), "full catalog sorted by name");
}

#[test]
fn test_parse_detail_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(
        temp_file,
        r#"<h1 class="gpudb-name">Example GPU</h1>
<dl><dt>Transistors</dt>
<dd>1,000,000</dd></dl>
<dl><dt>Release Date</dt>
<dd>Jan 1st, 2020</dd></dl>"#
    )?;

    let record = parse_detail_file(temp_file.path())?;
    assert_eq!(
        record,
        GpuRecord::new("Example GPU", "1,000,000", "Jan 1st, 2020")
    );
    Ok(())
}

#[test]
fn test_parse_detail_file_missing() {
    let result = parse_detail_file(std::path::Path::new("/nonexistent/page.html"));
    assert!(result.is_err());
}

#[test]
fn test_record_to_csv() {
    let record = GpuRecord::new("Example GPU", "1,000,000", "N/A");
    assert_eq!(
        record_to_csv(&record, true).unwrap(),
        "GPU Name,Transistor Count,Release Date\r\nExample GPU,\"1,000,000\",N/A\r\n"
    );
    assert_eq!(
        record_to_csv(&record, false).unwrap(),
        "Example GPU,\"1,000,000\",N/A\r\n"
    );
}
