//! quotes-core - Core library for Quotes
//!
//! This crate holds the quote models, the local replica and its persistence,
//! the merge engine and conflict ledger, remote adapters, and the sync
//! orchestrator used by the `quotes` CLI.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod ledger;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod remote;
pub mod replica;
pub mod services;
pub mod storage;
pub mod sync;
pub mod util;

pub use error::{Error, Result, ValidationError};
pub use models::{CategoryFilter, Conflict, Quote, QuoteId, RawQuote, Resolution, Source};
pub use services::{LoadOptions, QuoteBook, QuoteService};
pub use sync::{SyncHandle, SyncOrchestrator, SyncOutcome, SyncReport, SyncStatus};
