//! Record every site listed in a sites file

use std::path::Path;

use pagewatch_core::config::{SiteConfig, load_sites};
use pagewatch_core::error::{UnifiedError, WatchError, WatchResult};

use super::AppContext;
use super::record::observation;

#[derive(Debug, Default)]
struct BatchSummary {
    total: usize,
    updated: usize,
    unchanged: usize,
    errors: usize,
}

/// Record one site; `Ok(true)` when a change was recorded
async fn record_site(ctx: &AppContext, site: &SiteConfig) -> WatchResult<bool> {
    let content = tokio::fs::read_to_string(&site.path).await.map_err(|e| {
        WatchError::io_with_path(
            format!("Failed to read observed content: {}", e),
            site.path.display().to_string(),
        )
    })?;
    let observation = observation(
        content,
        None,
        site.source_link.clone(),
        site.title.clone(),
        None,
    )?;

    let archive = ctx.open_archive(&site.feed_name).await?;
    Ok(archive.observe(observation).await?.is_changed())
}

pub async fn execute(ctx: &AppContext, sites_path: &Path) -> WatchResult<()> {
    let entries = load_sites(sites_path)?;
    let mut summary = BatchSummary {
        total: entries.len(),
        ..Default::default()
    };
    ctx.console.info(&format!(
        "Processing {} sites from {}",
        summary.total,
        sites_path.display()
    ));

    for entry in &entries {
        let site = match entry {
            Ok(site) => site,
            Err(e) => {
                summary.errors += 1;
                tracing::warn!(error = %e, "skipping invalid site entry");
                ctx.console
                    .error(&format!("skipping invalid site entry: [{}] {}", e.error_code(), e));
                continue;
            }
        };

        match record_site(ctx, site).await {
            Ok(true) => {
                summary.updated += 1;
                ctx.console.success(&format!("{}: updated", site.feed_name));
            }
            Ok(false) => {
                summary.unchanged += 1;
                ctx.console.info(&format!("{}: unchanged", site.feed_name));
            }
            Err(e) => {
                summary.errors += 1;
                tracing::error!(feed = %site.feed_name, error = %e, "batch entry failed");
                ctx.console
                    .error(&format!("{}: [{}] {}", site.feed_name, e.error_code(), e));
            }
        }
    }

    ctx.console.print_header("Batch summary");
    println!("Total:     {}", summary.total);
    println!("Updated:   {}", summary.updated);
    println!("Unchanged: {}", summary.unchanged);
    println!("Errors:    {}", summary.errors);

    if summary.errors > 0 {
        return Err(WatchError::other(format!(
            "{} of {} sites failed",
            summary.errors, summary.total
        )));
    }
    Ok(())
}
