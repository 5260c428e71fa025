//! List stored feeds

use pagewatch_core::error::WatchResult;

use super::AppContext;

pub async fn execute(ctx: &AppContext) -> WatchResult<()> {
    let feeds = ctx.storage.feeds().await?;
    if feeds.is_empty() {
        ctx.console
            .warn(&format!("No feeds in {}", ctx.storage_dir.display()));
    }
    for feed in feeds {
        println!("{}", feed);
    }
    Ok(())
}
