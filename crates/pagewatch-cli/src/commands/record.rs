//! Record newly observed content

use std::path::PathBuf;

use chrono::Utc;
use pagewatch_core::error::{ResultExt, WatchError, WatchResult};
use pagewatch_core::reconstruct::parse_timestamp;
use pagewatch_core::{Detection, Observation};
use tokio::io::AsyncReadExt;

use super::AppContext;

pub struct RecordArgs {
    pub feed: String,
    pub file: Option<PathBuf>,
    pub source_link: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub at: Option<String>,
}

/// Read observed content from a file, or stdin when no file is given
async fn read_content(file: Option<&PathBuf>) -> WatchResult<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            WatchError::io_with_path(
                format!("Failed to read observed content: {}", e),
                path.display().to_string(),
            )
        }),
        None => {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read observed content from stdin")?;
            Ok(content)
        }
    }
}

/// Build the observation described by `args`
pub(crate) fn observation(
    content: String,
    at: Option<&str>,
    source_link: Option<String>,
    title: Option<String>,
    description: Option<String>,
) -> WatchResult<Observation> {
    let observed_at = match at {
        Some(raw) => parse_timestamp(raw)?,
        None => Utc::now(),
    };

    let mut observation = Observation::new(content, observed_at);
    if let Some(link) = source_link {
        observation = observation.with_source_link(link);
    }
    if let Some(title) = title {
        observation = observation.with_title(title);
    }
    if let Some(description) = description {
        observation = observation.with_description(description);
    }
    Ok(observation)
}

pub async fn execute(ctx: &AppContext, args: RecordArgs) -> WatchResult<()> {
    let content = read_content(args.file.as_ref()).await?;
    let observation = observation(
        content,
        args.at.as_deref(),
        args.source_link,
        args.title,
        args.description,
    )?;

    let archive = ctx.open_archive(&args.feed).await?;
    let changed = match archive.observe(observation).await? {
        Detection::Changed { record, .. } if record.is_baseline() => {
            ctx.console
                .success(&format!("{}: recorded baseline {}", args.feed, record.id));
            true
        }
        Detection::Changed { record, .. } => {
            ctx.console.success(&format!(
                "{}: recorded change {} ({})",
                args.feed,
                record.id,
                record.stats()
            ));
            true
        }
        Detection::Unchanged { .. } => {
            ctx.console.info(&format!("{}: no changes detected", args.feed));
            false
        }
    };

    println!("{}", if changed { "changed" } else { "unchanged" });
    Ok(())
}
