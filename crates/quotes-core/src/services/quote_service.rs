//! Shared quote service used by the CLI and the sync orchestrator.

use std::sync::Arc;

use rand::thread_rng;
use tokio::sync::Mutex;

use super::book::{LoadOptions, QuoteBook};
use crate::merge::MergeOutcome;
use crate::models::{CategoryFilter, Conflict, Quote, QuoteId, RawQuote, Resolution};
use crate::replica::ImportReport;
use crate::storage::BlobStore;
use crate::Result;

/// Cloneable handle over one [`QuoteBook`].
///
/// Every operation holds the book lock until it has finished, persistence
/// included, so user mutations and a sync merge never interleave.
pub struct QuoteService<S> {
    book: Arc<Mutex<QuoteBook<S>>>,
}

impl<S> Clone for QuoteService<S> {
    fn clone(&self) -> Self {
        Self {
            book: Arc::clone(&self.book),
        }
    }
}

impl<S: BlobStore> QuoteService<S> {
    /// Wrap an already constructed book.
    pub fn new(book: QuoteBook<S>) -> Self {
        Self {
            book: Arc::new(Mutex::new(book)),
        }
    }

    /// Load the persisted book from `storage`.
    pub async fn open(storage: S, options: LoadOptions) -> Result<Self> {
        Ok(Self::new(QuoteBook::load(storage, options).await?))
    }

    /// Flush every blob. The service stays usable afterwards.
    pub async fn flush(&self) -> Result<()> {
        let book = self.book.lock().await;
        book.flush().await?;
        tracing::debug!(quotes = book.replica().len(), "Flushed quote book");
        Ok(())
    }

    /// Release this handle, flushing the book when it was the last one.
    pub async fn dispose(self) -> Result<Option<S>> {
        match Arc::try_unwrap(self.book) {
            Ok(book) => Ok(Some(book.into_inner().dispose().await?)),
            Err(_) => Ok(None),
        }
    }

    /// All quotes in insertion order.
    pub async fn list(&self) -> Vec<Quote> {
        let book = self.book.lock().await;
        book.replica().all().to_vec()
    }

    /// Quotes matching `filter`, in insertion order.
    pub async fn by_category(&self, filter: &CategoryFilter) -> Vec<Quote> {
        let book = self.book.lock().await;
        book.replica()
            .by_category(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Fetch a quote by id.
    pub async fn get(&self, id: &QuoteId) -> Option<Quote> {
        let book = self.book.lock().await;
        book.replica().get(id).cloned()
    }

    /// Distinct categories, sorted.
    pub async fn categories(&self) -> Vec<String> {
        let book = self.book.lock().await;
        book.replica().categories()
    }

    /// Random quote matching `filter`.
    pub async fn random(&self, filter: &CategoryFilter) -> Option<Quote> {
        let book = self.book.lock().await;
        book.replica().random(filter, &mut thread_rng()).cloned()
    }

    /// Add a locally authored quote.
    pub async fn add(&self, raw: RawQuote) -> Result<Quote> {
        let mut book = self.book.lock().await;
        book.add(raw).await
    }

    /// Import a batch of raw quotes.
    pub async fn import(&self, raws: Vec<RawQuote>) -> Result<ImportReport> {
        let mut book = self.book.lock().await;
        book.import(raws).await
    }

    /// Open conflicts in detection order.
    pub async fn conflicts(&self) -> Vec<Conflict> {
        let book = self.book.lock().await;
        book.conflicts().to_vec()
    }

    /// Number of open conflicts.
    pub async fn conflict_count(&self) -> usize {
        let book = self.book.lock().await;
        book.ledger().len()
    }

    /// Resolve the open conflict for `id`.
    pub async fn resolve(&self, id: &QuoteId, choice: Resolution) -> Result<Option<Quote>> {
        let mut book = self.book.lock().await;
        book.resolve(id, choice).await
    }

    /// Merge a normalized remote batch and persist the result.
    ///
    /// Returns the merge outcome together with the number of conflicts open
    /// after the merge.
    pub async fn apply_remote_batch(&self, batch: Vec<Quote>) -> Result<(MergeOutcome, usize)> {
        let mut book = self.book.lock().await;
        let outcome = book.apply_remote_batch(batch).await?;
        Ok((outcome, book.ledger().len()))
    }

    /// Saved category filter.
    pub async fn selected_category(&self) -> CategoryFilter {
        let book = self.book.lock().await;
        book.filter().clone()
    }

    /// Save the category filter.
    pub async fn set_selected_category(&self, filter: CategoryFilter) -> Result<()> {
        let mut book = self.book.lock().await;
        book.set_filter(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBlobStore;
    use crate::Error;

    async fn service() -> QuoteService<MemoryBlobStore> {
        QuoteService::open(
            MemoryBlobStore::new(),
            LoadOptions {
                seed_defaults: false,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn add_and_list_roundtrip() {
        let service = service().await;

        service
            .add(RawQuote::new("hello quotes", "Life"))
            .await
            .unwrap();
        let quotes = service.list().await;
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "hello quotes");
        assert_eq!(service.categories().await, vec!["Life"]);
    }

    #[tokio::test]
    async fn validation_failure_leaves_replica_unchanged() {
        let service = service().await;
        let error = service.add(RawQuote::new("", "X")).await.unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
        assert!(service.list().await.is_empty());
    }

    #[tokio::test]
    async fn selected_category_filters_lists() {
        let service = service().await;
        service.add(RawQuote::new("a", "Life")).await.unwrap();
        service.add(RawQuote::new("b", "Work")).await.unwrap();

        service
            .set_selected_category(CategoryFilter::parse("Work"))
            .await
            .unwrap();
        let filter = service.selected_category().await;
        let quotes = service.by_category(&filter).await;
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "b");
        assert_eq!(service.random(&filter).await.unwrap().text, "b");
    }

    #[tokio::test]
    async fn dispose_returns_storage_for_last_handle() {
        let service = service().await;
        let other = service.clone();
        assert!(other.dispose().await.unwrap().is_none());

        service.add(RawQuote::new("kept", "Life")).await.unwrap();
        let storage = service.dispose().await.unwrap().unwrap();
        assert!(storage.get(crate::storage::QUOTES_KEY).is_some());
    }

    #[tokio::test]
    async fn remote_batch_with_blank_quote_is_not_stored() {
        let service = service().await;
        let mut blank = crate::normalize::normalize(
            RawQuote::new("placeholder", "Server").with_id("srv-9"),
            crate::models::Source::Server,
        );
        blank.text = String::new();
        blank.category = String::new();

        let (outcome, open_conflicts) = service.apply_remote_batch(vec![blank]).await.unwrap();

        assert!(outcome.is_noop());
        assert_eq!(open_conflicts, 0);
        assert!(service.list().await.is_empty());
    }
}
