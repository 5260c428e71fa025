//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default sites file for `batch`
pub const DEFAULT_SITES_FILE: &str = "sites.toml";

#[derive(Parser)]
#[command(name = "pagewatch")]
#[command(about = "Track documents as a current snapshot plus a history of diffs")]
#[command(
    long_about = r#"Track documents as a current snapshot plus a history of diffs

USAGE:
  pagewatch record <feed> --file page.txt   # Record observed content
  pagewatch show <feed> --at 2025-08-11      # Rebuild the document at a time
  pagewatch log <feed>                       # List recorded changes
  pagewatch diff <feed> <id>                 # Print one stored diff
  pagewatch batch --sites sites.toml         # Record every listed site

UTILITY COMMANDS:
  pagewatch config init                      # Create config file
  pagewatch config show                      # Show effective config"#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (default: ./pagewatch.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the archives
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record newly observed content of a feed
    Record {
        /// Feed name
        feed: String,

        /// File with the observed content (stdin when omitted)
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Link the content was observed at
        #[arg(long)]
        source_link: Option<String>,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Description of the change
        #[arg(long)]
        description: Option<String>,

        /// Observation time (RFC 3339 or YYYY-MM-DD; default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Print a feed's document as it was at a point in time
    Show {
        /// Feed name
        feed: String,

        /// Point in time (RFC 3339 or YYYY-MM-DD; default: current version)
        #[arg(long)]
        at: Option<String>,
    },

    /// List a feed's change records, newest first
    Log {
        /// Feed name
        feed: String,

        /// Maximum number of records to list
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: usize,
    },

    /// Print the stored diff of one record
    Diff {
        /// Feed name
        feed: String,

        /// Record id or unique id prefix
        id: String,
    },

    /// Record every site listed in a sites file
    Batch {
        /// Sites file
        #[arg(long, default_value = DEFAULT_SITES_FILE)]
        sites: PathBuf,
    },

    /// List stored feeds
    Feeds,

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display the effective configuration
    Show,

    /// Validate the configuration
    Validate,

    /// Create a new configuration file with defaults
    Init {
        /// Path for the new configuration file
        #[arg(long)]
        path: Option<PathBuf>,
    },
}
