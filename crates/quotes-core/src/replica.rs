//! Local replica store
//!
//! The replica owns the ordered list of quotes for this client. Insertion
//! order is preserved and is the only order the replica guarantees. Every
//! mutation goes through this type so the id uniqueness invariant holds.

use std::collections::{BTreeSet, HashMap};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ValidationError;
use crate::models::{CategoryFilter, Quote, QuoteId, RawQuote, Source};
use crate::normalize::{normalize, own_source, validate};

/// Outcome of [`Replica::import_batch`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Quotes appended to the replica
    pub imported: usize,
    /// Entries discarded by validation
    pub rejected: usize,
    /// Rejection reason per discarded entry, by position in the input
    pub errors: Vec<(usize, ValidationError)>,
}

/// Authoritative in-memory list of quotes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replica {
    quotes: Vec<Quote>,
    index: HashMap<QuoteId, usize>,
}

impl Replica {
    /// Create an empty replica
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a replica from persisted quotes.
    ///
    /// Entries are normalized with their own source as fallback; invalid
    /// entries and repeated ids (first occurrence wins) are dropped.
    #[must_use]
    pub fn from_raw(raws: Vec<RawQuote>) -> Self {
        let mut replica = Self::new();
        let report = replica.import_batch(raws);
        if report.rejected > 0 {
            tracing::warn!(
                "Dropped {} invalid quote(s) while loading the replica",
                report.rejected
            );
        }
        replica
    }

    /// Normalize `raw` as a locally authored quote and append it.
    pub fn add(&mut self, raw: RawQuote) -> Result<Quote, ValidationError> {
        let quote = normalize(raw, Source::Local);
        self.try_push(quote.clone())?;
        Ok(quote)
    }

    /// Append every valid entry of `raws`, normalizing each with its own
    /// `source` as the fallback namespace.
    pub fn import_batch(&mut self, raws: Vec<RawQuote>) -> ImportReport {
        let mut report = ImportReport::default();

        for (position, raw) in raws.into_iter().enumerate() {
            let fallback = own_source(&raw);
            match self.try_push(normalize(raw, fallback)) {
                Ok(()) => report.imported += 1,
                Err(error) => {
                    report.rejected += 1;
                    report.errors.push((position, error));
                }
            }
        }

        report
    }

    /// Look up a quote by id
    #[must_use]
    pub fn get(&self, id: &QuoteId) -> Option<&Quote> {
        self.index.get(id).map(|&position| &self.quotes[position])
    }

    /// All quotes in insertion order
    #[must_use]
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    #[must_use]
    pub fn contains(&self, id: &QuoteId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Replace the quote stored under `id`, keeping its position.
    ///
    /// The stored id is always `id`, whatever `quote.id` says. Returns
    /// `false` when no quote has that id.
    pub fn replace(&mut self, id: &QuoteId, mut quote: Quote) -> bool {
        let Some(&position) = self.index.get(id) else {
            return false;
        };
        quote.id = id.clone();
        self.quotes[position] = quote;
        true
    }

    /// Replace the quote with the same id, or append it when absent.
    pub fn upsert(&mut self, quote: Quote) {
        let id = quote.id.clone();
        if !self.replace(&id, quote.clone()) {
            self.push_unchecked(quote);
        }
    }

    /// Mutable access used by the merge engine for bookkeeping updates
    pub(crate) fn get_mut(&mut self, id: &QuoteId) -> Option<&mut Quote> {
        let position = *self.index.get(id)?;
        self.quotes.get_mut(position)
    }

    /// Append a quote whose id is known to be absent
    pub(crate) fn push_unchecked(&mut self, quote: Quote) {
        debug_assert!(!self.index.contains_key(&quote.id));
        self.index.insert(quote.id.clone(), self.quotes.len());
        self.quotes.push(quote);
    }

    /// Distinct categories, sorted
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.quotes
            .iter()
            .map(|quote| quote.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Quotes matching `filter`, in insertion order
    #[must_use]
    pub fn by_category(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.quotes
            .iter()
            .filter(|quote| filter.matches(&quote.category))
            .collect()
    }

    /// Pick a random quote matching `filter`
    pub fn random<R: Rng + ?Sized>(&self, filter: &CategoryFilter, rng: &mut R) -> Option<&Quote> {
        self.by_category(filter).choose(rng).copied()
    }

    fn try_push(&mut self, quote: Quote) -> Result<(), ValidationError> {
        validate(&quote)?;
        if self.index.contains_key(&quote.id) {
            return Err(ValidationError::DuplicateId(quote.id.to_string()));
        }
        self.push_unchecked(quote);
        Ok(())
    }
}
