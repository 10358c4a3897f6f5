//! Quotes CLI - keep a local quote collection in step with a remote feed
//!
//! Quick capture, browsing, import/export, and sync from the terminal.

mod cli;
mod commands;
mod config_file;
mod error;


use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, SyncCommands};
use crate::commands::add::run_add;
use crate::commands::categories::run_categories;
use crate::commands::common::resolve_db_path;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::filter::run_filter;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::random::run_random;
use crate::commands::sync::{run_sync, run_sync_conflicts, run_sync_resolve, run_sync_watch};
use crate::config_file::{default_config_path, CliConfig};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let command = match cli.command {
        Some(Commands::Config { command }) => return run_config(command, &config_path),
        Some(Commands::Completions { shell, output }) => {
            return run_completions(shell, output.as_deref());
        }
        command => command,
    };

    let mut file_config = CliConfig::load_from_path(&config_path)?;
    file_config.apply_env_overrides()?;
    file_config.sync.validate()?;
    let db_path = resolve_db_path(cli.db_path, &file_config);
    let config = file_config.sync;

    match command {
        Some(Commands::Add {
            text,
            author,
            category,
        }) => run_add(&text, author, category, &db_path, &config).await?,
        Some(Commands::List {
            category,
            limit,
            json,
        }) => run_list(category.as_deref(), limit, json, &db_path, &config).await?,
        Some(Commands::Categories) => run_categories(&db_path, &config).await?,
        Some(Commands::Filter { category, clear }) => {
            run_filter(category.as_deref(), clear, &db_path, &config).await?;
        }
        Some(Commands::Random { category }) => {
            run_random(category.as_deref(), &db_path, &config).await?;
        }
        Some(Commands::Import { path }) => run_import(&path, &db_path, &config).await?,
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), &db_path, &config).await?;
        }
        Some(Commands::Sync {
            remote_file,
            command,
        }) => match command {
            None => run_sync(remote_file.as_deref(), &db_path, &config).await?,
            Some(SyncCommands::Watch { interval }) => {
                run_sync_watch(interval, remote_file.as_deref(), &db_path, &config).await?;
            }
            Some(SyncCommands::Conflicts { json }) => {
                run_sync_conflicts(json, &db_path, &config).await?;
            }
            Some(SyncCommands::Resolve { id, keep }) => {
                run_sync_resolve(&id, keep, &db_path, &config).await?;
            }
        },
        Some(Commands::Config { .. } | Commands::Completions { .. }) => {}
        None => {
            // Quick capture mode: quotes "words worth keeping"
            if cli.quote.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                run_add(&cli.quote, None, None, &db_path, &config).await?;
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env();
    let filter = match "quotes=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
