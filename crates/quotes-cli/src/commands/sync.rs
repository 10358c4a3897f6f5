use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use quotes_core::config::SyncConfig;
use quotes_core::remote::{FileRemoteSource, RemoteSource};
use quotes_core::sync::OrchestratorStopped;
use quotes_core::{QuoteId, SyncOrchestrator, SyncOutcome, SyncReport};

use crate::cli::KeepSide;
use crate::commands::common::{
    conflict_to_item, format_conflict_lines, format_timestamp, normalize_quote_identifier,
    open_service, quote_preview, CliQuoteService, ConflictItem,
};
use crate::error::CliError;

pub async fn run_sync(
    remote_file: Option<&Path>,
    db_path: &Path,
    config: &SyncConfig,
) -> Result<(), CliError> {
    let service = open_service(db_path, config).await?;
    let report = match remote_file {
        Some(path) => sync_once(service, FileRemoteSource::new(path)).await?,
        None => sync_once(service, config.http_remote()?).await?,
    };

    println!("{}", report.summary());
    if report.open_conflicts > 0 {
        println!("Run `quotes sync conflicts` to review, `quotes sync resolve <id> --keep local|server` to revert.");
    }
    Ok(())
}

/// Run a single cycle against `remote`.
pub async fn sync_once<R: RemoteSource>(
    service: CliQuoteService,
    remote: R,
) -> Result<SyncReport, CliError> {
    let (mut orchestrator, _handle) = SyncOrchestrator::new(service, remote);
    match orchestrator.run_cycle().await {
        SyncOutcome::Completed(report) => Ok(report),
        SyncOutcome::Failed(message) => Err(CliError::SyncFailed(message)),
    }
}

pub async fn run_sync_watch(
    interval_secs: Option<u64>,
    remote_file: Option<&Path>,
    db_path: &Path,
    config: &SyncConfig,
) -> Result<(), CliError> {
    let interval = interval_secs.map_or_else(|| config.sync_interval(), Duration::from_secs);
    if interval.is_zero() {
        return Err(CliError::Config(
            "sync interval must be greater than zero".to_string(),
        ));
    }

    let service = open_service(db_path, config).await?;
    match remote_file {
        Some(path) => watch(service, FileRemoteSource::new(path), interval).await,
        None => watch(service, config.http_remote()?, interval).await,
    }
}

async fn watch<R: RemoteSource>(
    service: CliQuoteService,
    remote: R,
    interval: Duration,
) -> Result<(), CliError> {
    let label = remote.describe();
    let (orchestrator, handle) = SyncOrchestrator::new(service, remote);
    let mut status = orchestrator.subscribe();
    let ticker = orchestrator
        .spawn_ticker(interval)
        .ok_or(OrchestratorStopped)?;
    let cycles = tokio::spawn(orchestrator.run());

    println!(
        "Syncing with {label} every {}s (Ctrl-C to stop)",
        interval.as_secs()
    );
    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                if !current.is_syncing() {
                    println!("{}  {current}", format_timestamp(Utc::now()));
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }

    ticker.abort();
    if handle.shutdown().await.is_err() {
        tracing::debug!("Sync loop already stopped");
    }
    cycles
        .await
        .map_err(|error| CliError::SyncFailed(error.to_string()))
}

pub async fn run_sync_conflicts(
    as_json: bool,
    db_path: &Path,
    config: &SyncConfig,
) -> Result<(), CliError> {
    let service = open_service(db_path, config).await?;
    let conflicts = service.conflicts().await;

    if as_json {
        let json_items = conflicts
            .iter()
            .map(conflict_to_item)
            .collect::<Vec<ConflictItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if conflicts.is_empty() {
        println!("No open sync conflicts.");
        return Ok(());
    }

    for line in format_conflict_lines(&conflicts) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_sync_resolve(
    id: &str,
    keep: KeepSide,
    db_path: &Path,
    config: &SyncConfig,
) -> Result<(), CliError> {
    let id = normalize_quote_identifier(id)?;
    let service = open_service(db_path, config).await?;

    let Some(quote) = service.resolve(&QuoteId::from(id.as_str()), keep.into()).await? else {
        return Err(CliError::ConflictNotFound(id));
    };

    println!("{}  {}", quote.id, quote_preview(&quote.text, 60));
    Ok(())
}
