//! Batch sites file
//!
//! Lists the feeds to record in one `batch` run and where the fetcher left
//! each feed's observed content.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{WatchError, WatchResult};
use crate::storage::validate_feed_name;

/// One tracked site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub feed_name: String,
    /// File holding the observed content; relative to the sites file
    pub path: PathBuf,
    pub source_link: Option<String>,
    pub title: Option<String>,
}

impl SiteConfig {
    /// Check the entry on its own
    pub fn validate(&self) -> WatchResult<()> {
        validate_feed_name(&self.feed_name)?;
        if self.path.as_os_str().is_empty() {
            return Err(WatchError::invalid_input_field(
                format!("site '{}' has no content path", self.feed_name),
                "path",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitesFile {
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

/// A sites file entry: usable, or the reason it is skipped
pub type SiteEntry = WatchResult<SiteConfig>;

/// Load a sites file
///
/// Each entry is checked separately so one bad entry does not stop the
/// others; an entry repeating an earlier feed is rejected. Relative content
/// paths are resolved against the file's directory. A file listing no sites
/// is an error.
pub fn load_sites(path: &Path) -> WatchResult<Vec<SiteEntry>> {
    let content = fs::read_to_string(path).map_err(|e| {
        WatchError::config_with_context(
            format!("Failed to read sites file: {}", e),
            format!("Reading sites from '{}'", path.display()),
        )
    })?;
    let file: SitesFile = toml::from_str(&content).map_err(|e| {
        WatchError::config_with_context(
            format!("Failed to parse sites file: {}", e),
            format!("Deserializing sites from '{}'", path.display()),
        )
    })?;

    if file.sites.is_empty() {
        return Err(WatchError::config(format!(
            "No sites found in '{}'",
            path.display()
        )));
    }

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let mut seen = HashSet::new();

    let entries = file
        .sites
        .into_iter()
        .map(|mut site| -> SiteEntry {
            site.validate()?;
            if !seen.insert(site.feed_name.clone()) {
                return Err(WatchError::config(format!(
                    "feed '{}' is listed more than once",
                    site.feed_name
                )));
            }
            if site.path.is_relative() {
                site.path = base.join(&site.path);
            }
            Ok(site)
        })
        .collect();

    Ok(entries)
}
