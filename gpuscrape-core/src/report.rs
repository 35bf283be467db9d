// Plain-text run summary

use crate::scrape::ScrapeOutcome;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Render the summary of a finished scrape.
pub fn generate_scrape_report(outcome: &ScrapeOutcome) -> String {
    let s = &outcome.summary;

    let mut report = String::new();
    report.push_str(RULE);
    report.push_str("\n\n# Summary:\n");
    report.push_str(&format!("  Segments crawled: {}\n", s.segments));
    report.push_str(&format!("  Index pages fetched: {}\n", s.index_pages));
    report.push_str(&format!("  Detail pages fetched: {}\n", s.detail_pages));
    report.push_str(&format!(
        "  Records written: {} -> {}\n",
        s.records_written,
        outcome.output_path.display()
    ));

    if s.details_skipped > 0 {
        report.push_str(&format!("  Detail pages skipped: {}\n", s.details_skipped));
    }
    if s.write_failures > 0 {
        report.push_str(&format!("  Write failures: {}\n", s.write_failures));
    }

    report.push_str(&format!("  Elapsed: {}\n", format_elapsed(outcome.elapsed.as_secs())));
    report.push('\n');
    report.push_str(RULE);
    report.push('\n');
    report
}

fn format_elapsed(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0s");
        assert_eq!(format_elapsed(75), "1m 15s");
        assert_eq!(format_elapsed(3 * 3600 + 5), "3h 00m 05s");
    }
}
