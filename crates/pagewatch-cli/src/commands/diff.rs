//! Print the stored diff of one record

use colored::*;
use pagewatch_core::diff::serialize;
use pagewatch_core::error::{WatchError, WatchResult};
use pagewatch_core::RecordId;

use super::AppContext;

pub async fn execute(ctx: &AppContext, feed: &str, id: &str) -> WatchResult<()> {
    let archive = ctx.open_existing(feed).await?;
    let state = archive.current();

    let record = state
        .history
        .get(&RecordId::from_string(id))
        .or_else(|| state.history.find_by_prefix(id))
        .ok_or_else(|| {
            WatchError::not_found_resource(
                format!("no single record in '{}' matches '{}'", feed, id),
                "record",
            )
        })?;

    let Some(diff) = &record.diff else {
        ctx.console
            .warn(&format!("{} is a baseline record and has no diff", record.id));
        return Ok(());
    };

    for line in serialize(&diff.hunks).lines() {
        let styled = if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else {
            line.normal()
        };
        println!("{}", styled);
    }

    if !diff.is_clean() {
        ctx.console.warn(&format!(
            "{} hunks could not be parsed and were skipped",
            diff.unparseable.len()
        ));
    }
    Ok(())
}
