//! CLI commands

pub mod batch;
pub mod config;
pub mod diff;
pub mod feeds;
pub mod log;
pub mod record;
pub mod show;

use std::path::PathBuf;
use std::sync::Arc;

use pagewatch_core::config::Config;
use pagewatch_core::error::WatchResult;
use pagewatch_core::{Archive, FileHistoryStorage, HistoryStorage};

use crate::console::CliConsole;

/// Settings and storage shared by every command
pub struct AppContext {
    pub config: Config,
    pub storage_dir: PathBuf,
    pub storage: Arc<dyn HistoryStorage>,
    pub console: CliConsole,
}

impl AppContext {
    pub fn new(config: Config, verbose: bool) -> Self {
        let storage_dir = config.storage.resolved_dir();
        let storage: Arc<dyn HistoryStorage> = Arc::new(FileHistoryStorage::new(&storage_dir));
        Self {
            config,
            storage_dir,
            storage,
            console: CliConsole::new(verbose),
        }
    }

    /// Open a feed, creating it on first record
    pub async fn open_archive(&self, feed: &str) -> WatchResult<Archive> {
        let archive = Archive::open(feed, self.storage.clone(), self.config.detector()).await?;
        Ok(archive.with_max_records(self.config.history.max_records))
    }

    /// Open a feed that must already exist
    pub async fn open_existing(&self, feed: &str) -> WatchResult<Archive> {
        Archive::open_existing(feed, self.storage.clone(), self.config.detector()).await
    }
}
