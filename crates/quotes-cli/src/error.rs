use std::io;

use quotes_core::config::ConfigError;
use quotes_core::remote::FetchError;
use quotes_core::sync::OrchestratorStopped;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] quotes_core::Error),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    #[error(transparent)]
    SyncStopped(#[from] OrchestratorStopped),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No quote text provided")]
    EmptyText,
    #[error("Quote ID cannot be empty")]
    EmptyQuoteId,
    #[error("No open conflict for quote id: {0}")]
    ConflictNotFound(String),
    #[error("Import file is not usable: {0}")]
    InvalidImport(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Sync failed: {0}")]
    SyncFailed(String),
}
