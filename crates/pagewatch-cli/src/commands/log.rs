//! List change records

use colored::*;
use pagewatch_core::error::WatchResult;

use super::AppContext;

pub async fn execute(ctx: &AppContext, feed: &str, limit: usize) -> WatchResult<()> {
    let archive = ctx.open_existing(feed).await?;
    let state = archive.current();

    for record in state.history.iter().take(limit) {
        let change = if record.is_baseline() {
            "baseline".dimmed().to_string()
        } else {
            let stats = record.stats();
            format!(
                "{} {}",
                format!("+{}", stats.added).green(),
                format!("-{}", stats.removed).red()
            )
        };

        println!(
            "{}  {}  {}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().cyan(),
            record.id,
            change,
            record.title.as_deref().unwrap_or("")
        );

        let skipped = record.unparseable_hunks();
        if skipped > 0 {
            ctx.console
                .warn(&format!("{}: {} unparseable hunks", record.id, skipped));
        }
    }

    if state.history.len() > limit {
        ctx.console.info(&format!(
            "{} older records not shown",
            state.history.len() - limit
        ));
    }
    Ok(())
}
