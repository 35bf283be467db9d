//! Regex extraction over raw listing and detail markup.
//!
//! The patterns are tied to the current markup of the GPU database and will
//! silently stop matching if the site changes its layout.

use crate::record::{GpuRecord, SENTINEL};
use regex::Regex;
use std::sync::LazyLock;

static GPU_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:<tr>\s*<td\s.*\s*<a href=")(/gpu-specs/.*?)(?:">)"#)
        .expect("link pattern is valid")
});

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:h1 class="gpudb-name">)(.*?)(?:</h1>)"#).expect("name pattern is valid")
});

static TRANSISTORS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<dt>Transistors</dt>\s*<dd>(.+?)</dd>").expect("transistor pattern is valid")
});

static RELEASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<dt>Release Date</dt>\s*<dd>(.+?)</dd>").expect("release pattern is valid")
});

/// Collects detail-page paths from a listing page, in document order.
///
/// Duplicates are kept; deduplication is the caller's job.
pub fn extract_links(html: &str) -> Vec<String> {
    GPU_LINK_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Pulls name, transistor count and release date out of a detail page.
/// Any field that does not match becomes [`SENTINEL`].
pub fn parse_detail(html: &str) -> GpuRecord {
    GpuRecord {
        name: first_capture(&NAME_RE, html),
        transistors: first_capture(&TRANSISTORS_RE, html),
        release_date: first_capture(&RELEASE_RE, html),
    }
}

fn first_capture(re: &Regex, html: &str) -> String {
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| SENTINEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"<h1 class="gpudb-name">Example GPU</h1> ... <dt>Transistors</dt><dd>1,000,000</dd> ... <dt>Release Date</dt><dd>Jan 1st, 2020</dd>"#;

    fn listing_row(path: &str) -> String {
        format!(
            "<tr>\n\t<td class=\"vendor-NVIDIA\"><div class=\"item-name\"><a href=\"{}\">GPU</a></div></td>\n</tr>\n",
            path
        )
    }

    #[test]
    fn test_parse_detail_synthetic_page() {
        let record = parse_detail(DETAIL);
        assert_eq!(
            record,
            GpuRecord::new("Example GPU", "1,000,000", "Jan 1st, 2020")
        );
    }

    #[test]
    fn test_parse_detail_missing_release_date() {
        let html = r#"<h1 class="gpudb-name">Example GPU</h1><dt>Transistors</dt><dd>1,000,000</dd>"#;
        let record = parse_detail(html);
        assert_eq!(record.name, "Example GPU");
        assert_eq!(record.transistors, "1,000,000");
        assert_eq!(record.release_date, SENTINEL);
    }

    #[test]
    fn test_parse_detail_empty_page() {
        assert_eq!(parse_detail(""), GpuRecord::missing());
    }

    #[test]
    fn test_parse_detail_trims_whitespace() {
        let html = "<h1 class=\"gpudb-name\">  Radeon RX 7900 XTX </h1>\n<dl>\n<dt>Transistors</dt>\n    <dd> 57,700 million </dd>\n<dt>Release Date</dt>\n<dd>Nov 3rd, 2022</dd></dl>";
        let record = parse_detail(html);
        assert_eq!(record.name, "Radeon RX 7900 XTX");
        assert_eq!(record.transistors, "57,700 million");
        assert_eq!(record.release_date, "Nov 3rd, 2022");
    }

    #[test]
    fn test_parse_detail_name_is_lazy() {
        let html = r#"<h1 class="gpudb-name">First</h1><h1 class="gpudb-name">Second</h1>"#;
        assert_eq!(parse_detail(html).name, "First");
    }

    #[test]
    fn test_parse_detail_release_unknown_literal() {
        let html = "<dt>Release Date</dt><dd>Unknown</dd>";
        assert_eq!(parse_detail(html).release_date, "Unknown");
    }

    #[test]
    fn test_extract_links_in_document_order() {
        let mut html = String::from("<table class=\"processors\">\n");
        html.push_str(&listing_row("/gpu-specs/geforce-rtx-4090.c3889"));
        html.push_str(&listing_row("/gpu-specs/radeon-rx-7900-xtx.c3941"));
        html.push_str("</table>");

        assert_eq!(
            extract_links(&html),
            vec![
                "/gpu-specs/geforce-rtx-4090.c3889".to_string(),
                "/gpu-specs/radeon-rx-7900-xtx.c3941".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_links_keeps_duplicates() {
        let html = format!(
            "{}{}",
            listing_row("/gpu-specs/a.c1"),
            listing_row("/gpu-specs/a.c1")
        );
        assert_eq!(extract_links(&html).len(), 2);
    }

    #[test]
    fn test_extract_links_ignores_non_table_anchors() {
        let html = r#"<nav><a href="/gpu-specs/geforce-rtx-4090.c3889">RTX 4090</a></nav>"#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_extract_links_ignores_other_sections() {
        let html = "<tr>\n<td class=\"x\"><a href=\"/cpu-specs/ryzen.c1\">CPU</a></td></tr>";
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_extract_links_no_results_page() {
        let html = "<div class=\"table-wrapper\"><p>Nothing found.</p></div>";
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_name_stops_at_first_closing_tag() {
        let html = r#"<h1 class="gpudb-name">GeForce 256</h1><h1 class="gpudb-name">Other</h1>"#;
        assert_eq!(parse_detail(html).name, "GeForce 256");
    }
}
