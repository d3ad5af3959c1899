use std::fs;
use std::path::Path;

use tracing::info;

use crate::{Result, CITIES_FILE, IGNORE_LINKS_FILE, TITLES_FILE};

/// Read-only lists consulted by the extractors, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    /// A link containing any of these substrings is dropped.
    pub ignore_links: Vec<String>,
    /// Candidate home cities of reviewers.
    pub cities: Vec<String>,
    /// Title fragments that are known but not mapped to a rank.
    pub titles: Vec<String>,
}

impl ExtractConfig {
    /// Loads the three lists from `resource_dir`.
    pub fn load(resource_dir: &Path) -> Result<Self> {
        let config = Self {
            ignore_links: load_list(&resource_dir.join(IGNORE_LINKS_FILE))?,
            cities: load_list(&resource_dir.join(CITIES_FILE))?,
            titles: load_list(&resource_dir.join(TITLES_FILE))?,
        };
        info!(
            ignore_links = config.ignore_links.len(),
            cities = config.cities.len(),
            titles = config.titles.len(),
            "Loaded extraction config from {}",
            resource_dir.display()
        );
        Ok(config)
    }
}

pub fn load_list(path: &Path) -> Result<Vec<String>> {
    Ok(parse_list(&fs::read_to_string(path)?))
}

/// One entry per line; `#` starts a comment line, blank lines are skipped.
pub fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
