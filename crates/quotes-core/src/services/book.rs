//! The quote book: replica, conflict ledger, and view preferences bound to a
//! persistence provider.
//!
//! Every mutation runs on a working copy and is committed only after the
//! affected blobs were saved, so a failed save leaves the in-memory state as
//! it was.

use serde_json::Value;

use crate::error::Result;
use crate::ledger::ConflictLedger;
use crate::merge::{merge, MergeOutcome};
use crate::models::{CategoryFilter, Conflict, Quote, QuoteId, RawQuote, Resolution};
use crate::replica::{ImportReport, Replica};
use crate::storage::{BlobStore, CONFLICTS_KEY, QUOTES_KEY, SELECTED_CATEGORY_KEY};

/// How [`QuoteBook::load`] treats an empty or unreadable replica blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Seed [`default_quotes`] when no usable replica was persisted
    pub seed_defaults: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            seed_defaults: true,
        }
    }
}

/// Quotes a fresh installation starts with
#[must_use]
pub fn default_quotes() -> Vec<RawQuote> {
    vec![
        RawQuote::new(
            "Life is what happens when you're busy making other plans.",
            "Life",
        )
        .with_author("John Lennon"),
        RawQuote::new("Get busy living or get busy dying.", "Motivation")
            .with_author("Stephen King"),
        RawQuote::new("The purpose of our lives is to be happy.", "Life")
            .with_author("Dalai Lama"),
    ]
}

pub struct QuoteBook<S> {
    replica: Replica,
    ledger: ConflictLedger,
    filter: CategoryFilter,
    storage: S,
}

impl<S: BlobStore> QuoteBook<S> {
    /// Empty book over `storage`; nothing is read or written.
    pub fn create(storage: S) -> Self {
        Self {
            replica: Replica::new(),
            ledger: ConflictLedger::new(),
            filter: CategoryFilter::All,
            storage,
        }
    }

    /// Load the persisted state from `storage`.
    ///
    /// Missing or malformed blobs fall back to defaults instead of failing:
    /// an empty ledger, no category filter, and either an empty replica or the
    /// default quotes (persisted right away) depending on `options`.
    pub async fn load(storage: S, options: LoadOptions) -> Result<Self> {
        let mut book = Self::create(storage);

        let replica = match book.read_blob(QUOTES_KEY).await {
            Some(bytes) => decode_replica(&bytes),
            None => None,
        };
        match replica {
            Some(replica) if !replica.is_empty() => book.replica = replica,
            _ if options.seed_defaults => {
                tracing::info!("No stored quotes found; seeding defaults");
                book.replica.import_batch(default_quotes());
                book.persist_quotes(&book.replica).await?;
            }
            _ => {}
        }

        if let Some(bytes) = book.read_blob(CONFLICTS_KEY).await {
            book.ledger = ConflictLedger::from_persisted(&bytes);
        }

        if let Some(bytes) = book.read_blob(SELECTED_CATEGORY_KEY).await {
            book.filter = serde_json::from_slice::<String>(&bytes)
                .map(|value| CategoryFilter::parse(&value))
                .unwrap_or_default();
        }

        tracing::debug!(
            quotes = book.replica.len(),
            conflicts = book.ledger.len(),
            "Loaded quote book"
        );
        Ok(book)
    }

    /// Write every blob from the current in-memory state.
    pub async fn flush(&self) -> Result<()> {
        self.persist_quotes(&self.replica).await?;
        self.persist_conflicts(&self.ledger).await?;
        self.persist_filter(&self.filter).await
    }

    /// Flush every blob and hand the storage back.
    pub async fn dispose(self) -> Result<S> {
        self.flush().await?;
        Ok(self.storage)
    }

    pub const fn replica(&self) -> &Replica {
        &self.replica
    }

    pub const fn ledger(&self) -> &ConflictLedger {
        &self.ledger
    }

    pub const fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Add a locally authored quote and persist the replica.
    pub async fn add(&mut self, raw: RawQuote) -> Result<Quote> {
        let mut replica = self.replica.clone();
        let quote = replica.add(raw)?;
        self.persist_quotes(&replica).await?;
        self.replica = replica;
        Ok(quote)
    }

    /// Import a batch, persisting the replica when anything was added.
    pub async fn import(&mut self, raws: Vec<RawQuote>) -> Result<ImportReport> {
        let mut replica = self.replica.clone();
        let report = replica.import_batch(raws);
        if report.imported > 0 {
            self.persist_quotes(&replica).await?;
            self.replica = replica;
        }
        Ok(report)
    }

    /// Merge a remote batch, record its conflicts, and persist both blobs.
    pub async fn apply_remote_batch(&mut self, batch: Vec<Quote>) -> Result<MergeOutcome> {
        let mut replica = self.replica.clone();
        let mut ledger = self.ledger.clone();

        let outcome = merge(&mut replica, batch);
        for conflict in &outcome.conflicts {
            ledger.record(conflict.clone());
        }

        self.persist_pair(&replica, &ledger).await?;
        self.replica = replica;
        self.ledger = ledger;
        Ok(outcome)
    }

    /// Resolve the open conflict for `id`. Returns `None` when there is none.
    pub async fn resolve(&mut self, id: &QuoteId, choice: Resolution) -> Result<Option<Quote>> {
        let mut replica = self.replica.clone();
        let mut ledger = self.ledger.clone();

        let Some(resolved) = ledger.resolve(id, choice, &mut replica) else {
            return Ok(None);
        };

        self.persist_pair(&replica, &ledger).await?;
        self.replica = replica;
        self.ledger = ledger;
        Ok(Some(resolved))
    }

    /// Remember the category filter used by list views.
    pub async fn set_filter(&mut self, filter: CategoryFilter) -> Result<()> {
        self.persist_filter(&filter).await?;
        self.filter = filter;
        Ok(())
    }

    pub fn conflicts(&self) -> &[Conflict] {
        self.ledger.list()
    }

    async fn read_blob(&self, key: &str) -> Option<Vec<u8>> {
        match self.storage.load(key).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!("Failed to read stored {key}; using defaults: {error}");
                None
            }
        }
    }

    /// Save replica and ledger together. When the ledger save fails the
    /// previous replica blob is written back before the error is returned.
    async fn persist_pair(&self, replica: &Replica, ledger: &ConflictLedger) -> Result<()> {
        self.persist_quotes(replica).await?;
        if let Err(error) = self.persist_conflicts(ledger).await {
            if let Err(rollback) = self.persist_quotes(&self.replica).await {
                tracing::warn!("Failed to restore stored quotes after a failed save: {rollback}");
            }
            return Err(error);
        }
        Ok(())
    }

    async fn persist_quotes(&self, replica: &Replica) -> Result<()> {
        let bytes = serde_json::to_vec(replica.all())?;
        self.storage.save(QUOTES_KEY, bytes).await
    }

    async fn persist_conflicts(&self, ledger: &ConflictLedger) -> Result<()> {
        let bytes = serde_json::to_vec(ledger.list())?;
        self.storage.save(CONFLICTS_KEY, bytes).await
    }

    async fn persist_filter(&self, filter: &CategoryFilter) -> Result<()> {
        let bytes = serde_json::to_vec(filter.as_str())?;
        self.storage.save(SELECTED_CATEGORY_KEY, bytes).await
    }
}

/// Decode a persisted replica; `None` when the blob is not a JSON array.
fn decode_replica(bytes: &[u8]) -> Option<Replica> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Array(entries)) => Some(Replica::from_raw(
            entries.iter().map(RawQuote::from_json).collect(),
        )),
        Ok(_) => {
            tracing::warn!("Stored quotes are not a list; ignoring them");
            None
        }
        Err(error) => {
            tracing::warn!("Discarding malformed stored quotes: {error}");
            None
        }
    }
}
