use serde::{Deserialize, Serialize};

/// Value substituted for any field the detail page does not carry.
pub const SENTINEL: &str = "N/A";

/// Column headers of the output file, in row order.
pub const CSV_HEADER: [&str; 3] = ["GPU Name", "Transistor Count", "Release Date"];

/// One extracted row: name, transistor count and release date, all free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuRecord {
    #[serde(rename = "GPU Name")]
    pub name: String,
    #[serde(rename = "Transistor Count")]
    pub transistors: String,
    #[serde(rename = "Release Date")]
    pub release_date: String,
}

impl GpuRecord {
    pub fn new(
        name: impl Into<String>,
        transistors: impl Into<String>,
        release_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            transistors: transistors.into(),
            release_date: release_date.into(),
        }
    }

    /// A record where nothing could be extracted.
    pub fn missing() -> Self {
        Self::new(SENTINEL, SENTINEL, SENTINEL)
    }

    pub fn as_row(&self) -> [&str; 3] {
        [&self.name, &self.transistors, &self.release_date]
    }

    pub fn is_complete(&self) -> bool {
        self.as_row().iter().all(|field| *field != SENTINEL)
    }
}
