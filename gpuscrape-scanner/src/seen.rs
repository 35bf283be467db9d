use std::collections::HashSet;

/// Detail-page paths already visited in this run. Grows monotonically and is
/// never persisted, so a rerun starts from scratch.
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    paths: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `path`; returns `false` if it was already present.
    pub fn insert(&mut self, path: &str) -> bool {
        if self.paths.contains(path) {
            return false;
        }
        self.paths.insert(path.to_string())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Paths from `links` not yet visited, first occurrence only, order kept.
    /// Does not mark anything as seen.
    pub fn unseen(&self, links: &[String]) -> Vec<String> {
        let mut batch: HashSet<&str> = HashSet::new();
        links
            .iter()
            .filter(|link| !self.paths.contains(link.as_str()))
            .filter(|link| batch.insert(link.as_str()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
