//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::commands::{self, AppContext};
use pagewatch_core::config::{Config, ConfigValidator, load_config};
use pagewatch_core::error::WatchResult;

/// Effective configuration: file, then environment, then flags
///
/// `config init` starts from defaults since its target file may not exist yet.
pub fn load_settings(cli: &Cli) -> WatchResult<Config> {
    if let Commands::Config {
        action: ConfigAction::Init { .. },
    } = &cli.command
    {
        return Ok(Config::default());
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = &cli.storage_dir {
        config.storage.dir = dir.clone();
    }
    ConfigValidator::validate(&config)?;
    Ok(config)
}

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: Config) -> WatchResult<()> {
    let ctx = AppContext::new(config, cli.verbose);

    match cli.command {
        Commands::Record {
            feed,
            file,
            source_link,
            title,
            description,
            at,
        } => {
            let args = commands::record::RecordArgs {
                feed,
                file,
                source_link,
                title,
                description,
                at,
            };
            commands::record::execute(&ctx, args).await
        }
        Commands::Show { feed, at } => commands::show::execute(&ctx, &feed, at.as_deref()).await,
        Commands::Log { feed, limit } => commands::log::execute(&ctx, &feed, limit).await,
        Commands::Diff { feed, id } => commands::diff::execute(&ctx, &feed, &id).await,
        Commands::Batch { sites } => commands::batch::execute(&ctx, &sites).await,
        Commands::Feeds => commands::feeds::execute(&ctx).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&ctx.config, cli.config.as_deref()),
            ConfigAction::Validate => commands::config::validate(&ctx.config),
            ConfigAction::Init { path } => {
                commands::config::init(path.as_deref().or(cli.config.as_deref()))
            }
        },
    }
}
