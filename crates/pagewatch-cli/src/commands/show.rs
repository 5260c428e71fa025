//! Print a document as it was at a point in time

use pagewatch_core::error::{WatchError, WatchResult};
use pagewatch_core::{CommitOutcome, ReconstructionRequest, Viewer};

use super::AppContext;

pub async fn execute(ctx: &AppContext, feed: &str, at: Option<&str>) -> WatchResult<()> {
    let request = ReconstructionRequest::from_param(at)?;
    let archive = ctx.open_existing(feed).await?;
    let viewer = Viewer::new(archive.current(), ctx.config.reconstructor());

    let outcome = viewer.show(request).await?;
    let state = viewer.state();

    match outcome {
        CommitOutcome::Rendered => {
            print!("{}", state.displayed_text);
            ctx.console.status(&state.status.to_string());
            Ok(())
        }
        CommitOutcome::Failed => {
            ctx.console.error(&state.status.to_string());
            Err(WatchError::other(format!(
                "could not reconstruct '{}': {}",
                feed, state.status
            )))
        }
        CommitOutcome::Stale => Err(WatchError::other("view request was superseded")),
    }
}
