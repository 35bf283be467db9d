//! Enumeration of listing ("index") pages to visit.
//!
//! A plan is an ordered list of segments. Each segment is one listing query
//! that gets paginated from page 1 until the crawler decides it is exhausted.

use crate::error::{Result, ScanError};
use std::fmt;
use url::Url;

/// Integrated-graphics filter on the listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Igp {
    Yes,
    No,
}

impl Igp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Igp::Yes => "Yes",
            Igp::No => "No",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "yes" | "y" | "true" => Some(Igp::Yes),
            "no" | "n" | "false" => Some(Igp::No),
            _ => None,
        }
    }
}

impl fmt::Display for Igp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One brand/year/IGP combination of the filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingFilter {
    pub brand: String,
    pub year: u16,
    pub igp: Igp,
}

impl fmt::Display for ListingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | IGP: {}", self.brand, self.year, self.igp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexQuery {
    /// Whole catalog, paginated in `sort` order.
    Catalog { sort: String },
    /// Listing narrowed to a single filter combination.
    Filtered(ListingFilter),
}

impl IndexQuery {
    fn query_pairs(&self, page: usize) -> Vec<(&'static str, String)> {
        match self {
            IndexQuery::Catalog { sort } => {
                vec![("sort", sort.clone()), ("page", page.to_string())]
            }
            IndexQuery::Filtered(filter) => vec![
                ("mfgr", filter.brand.clone()),
                ("released", filter.year.to_string()),
                ("igp", filter.igp.as_str().to_string()),
                ("page", page.to_string()),
            ],
        }
    }
}

impl fmt::Display for IndexQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexQuery::Catalog { sort } => write!(f, "catalog (sort={})", sort),
            IndexQuery::Filtered(filter) => write!(f, "{}", filter),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlPlan {
    base_url: Url,
    list_path: String,
    segments: Vec<IndexQuery>,
}

impl CrawlPlan {
    pub fn new(base_url: &str, list_path: &str, segments: Vec<IndexQuery>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ScanError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }
        Ok(Self {
            base_url,
            list_path: list_path.to_string(),
            segments,
        })
    }

    /// Plain pagination over the full catalog.
    pub fn catalog(base_url: &str, list_path: &str, sort: &str) -> Result<Self> {
        Self::new(
            base_url,
            list_path,
            vec![IndexQuery::Catalog {
                sort: sort.to_string(),
            }],
        )
    }

    /// Cross product of brands × years × IGP flags, brand outermost.
    pub fn sweep(
        base_url: &str,
        list_path: &str,
        brands: &[String],
        years: impl IntoIterator<Item = u16> + Clone,
        igp_options: &[Igp],
    ) -> Result<Self> {
        let mut segments = Vec::new();
        for brand in brands {
            for year in years.clone() {
                for igp in igp_options {
                    segments.push(IndexQuery::Filtered(ListingFilter {
                        brand: brand.clone(),
                        year,
                        igp: *igp,
                    }));
                }
            }
        }
        Self::new(base_url, list_path, segments)
    }

    pub fn segments(&self) -> &[IndexQuery] {
        &self.segments
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn index_url(&self, query: &IndexQuery, page: usize) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&self.list_path)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", self.list_path, e)))?;
        url.query_pairs_mut()
            .clear()
            .extend_pairs(query.query_pairs(page).iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    /// Absolute URL of a detail page from its site-relative path.
    pub fn detail_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", path, e)))
    }
}
