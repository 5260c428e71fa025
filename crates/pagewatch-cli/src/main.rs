//! pagewatch command-line application
//!
//! Records observed document content as a snapshot plus a history of diffs,
//! and prints any earlier version on demand.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/pagewatch-cli
//! ```
//!
//! Logging goes to stderr. `RUST_LOG` takes precedence over the configured
//! `logging.level`; `--verbose` raises the default to `debug`.

mod args;
mod commands;
mod console;
mod router;

use args::Cli;
use clap::Parser;
use pagewatch_core::config::LoggingConfig;
use pagewatch_core::error::WatchResult;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> WatchResult<()> {
    let cli = Cli::parse();
    let config = router::load_settings(&cli)?;
    init_logging(&config.logging, cli.verbose);

    router::route(cli, config).await
}

/// Initialize logging with environment-based filtering
fn init_logging(logging: &LoggingConfig, verbose: bool) {
    if !logging.log_to_console {
        return;
    }

    let default_level = if verbose { "debug" } else { logging.level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if logging.is_json() {
        builder.json().try_init()
    } else if logging.format.eq_ignore_ascii_case("pretty") {
        builder.pretty().try_init()
    } else {
        builder.compact().try_init()
    };
    if let Err(e) = result {
        eprintln!("failed to initialize logging: {e}");
    }
}
