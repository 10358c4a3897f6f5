//! Remote source adapters.
//!
//! An adapter fetches the remote collection and translates it into raw quote
//! records that carry remote provenance (`source = server`, `srv-` ids). It
//! does not touch the replica; the sync orchestrator feeds its output to the
//! merge engine.

mod file;
mod http;

use std::future::Future;

use thiserror::Error;

use crate::models::{Quote, RawQuote, Source};
use crate::normalize::{normalize, validate};

pub use file::FileRemoteSource;
pub use http::{posts_to_raw_quotes, HttpRemoteSource};

/// Why a fetch produced no usable batch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid remote payload: {0}")]
    InvalidPayload(String),
    #[error("Remote source unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("Remote source unavailable: {0}")]
    Unavailable(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// A remote collection the client reconciles against but does not control
pub trait RemoteSource: Send + Sync + 'static {
    /// Fetch the current remote snapshot, in remote order
    fn fetch(&self) -> impl Future<Output = FetchResult<Vec<RawQuote>>> + Send;

    /// Short label used in logs and status lines
    fn describe(&self) -> String;
}

/// Normalize a fetched batch as server records, dropping entries that fail
/// validation.
#[must_use]
pub fn normalize_remote_batch(raws: Vec<RawQuote>) -> Vec<Quote> {
    let total = raws.len();
    let quotes = raws
        .into_iter()
        .map(|raw| normalize(raw, Source::Server))
        .filter(|quote| validate(quote).is_ok())
        .collect::<Vec<_>>();

    if quotes.len() < total {
        tracing::warn!(
            "Ignored {} remote record(s) without usable text",
            total - quotes.len()
        );
    }
    quotes
}
