//! Merge engine
//!
//! One-way reconciliation of a remote batch into the local replica. The remote
//! value always wins; when it overwrites different local content the previous
//! local value is returned as a [`Conflict`] so the caller can record it.

use std::collections::HashMap;

use crate::models::{Conflict, Quote, QuoteId};
use crate::normalize::validate;
use crate::replica::Replica;

/// Counters and conflicts produced by one merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Remote quotes that were new to the replica
    pub added: usize,
    /// Local quotes overwritten with different remote content
    pub updated: usize,
    /// One entry per overwritten quote, in batch order
    pub conflicts: Vec<Conflict>,
}

impl MergeOutcome {
    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.updated == 0 && self.conflicts.is_empty()
    }
}

/// Merge `batch` into `replica`.
///
/// Records are processed in batch order. When the batch carries several
/// records for one id, the last one wins and is processed at the position of
/// the first. Records that fail validation are skipped and never reach the
/// replica.
pub fn merge(replica: &mut Replica, batch: Vec<Quote>) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for remote in collapse_duplicates(batch) {
        if let Err(error) = validate(&remote) {
            tracing::warn!(id = %remote.id, "merge: skipping remote quote: {error}");
            continue;
        }

        let Some(local) = replica.get_mut(&remote.id) else {
            tracing::debug!(id = %remote.id, "merge: adding remote quote");
            replica.push_unchecked(remote);
            outcome.added += 1;
            continue;
        };

        if local.same_content(&remote) {
            local.updated_at = remote.updated_at;
            local.source = remote.source;
            continue;
        }

        tracing::debug!(id = %remote.id, "merge: remote content wins over local edit");
        let previous = std::mem::replace(local, remote.clone());
        outcome.conflicts.push(Conflict::new(previous, remote));
        outcome.updated += 1;
    }

    outcome
}

/// Keep one record per id: the last value, at the first position.
fn collapse_duplicates(batch: Vec<Quote>) -> Vec<Quote> {
    let mut slots: Vec<Quote> = Vec::with_capacity(batch.len());
    let mut positions: HashMap<QuoteId, usize> = HashMap::with_capacity(batch.len());

    for quote in batch {
        if let Some(&position) = positions.get(&quote.id) {
            slots[position] = quote;
        } else {
            positions.insert(quote.id.clone(), slots.len());
            slots.push(quote);
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawQuote, Source};
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;

    fn remote(id: &str, text: &str, category: &str) -> Quote {
        normalize(
            RawQuote::new(text, category)
                .with_id(id)
                .with_source(Source::Server),
            Source::Server,
        )
    }

    fn local_replica() -> Replica {
        let mut replica = Replica::new();
        replica
            .add(RawQuote::new("Life...", "Life").with_id("a"))
            .unwrap();
        replica
    }

    #[test]
    fn end_to_end_scenario() {
        let mut replica = local_replica();
        let outcome = merge(
            &mut replica,
            vec![remote("a", "Changed", "Life"), remote("b", "New", "Life")],
        );

        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.conflict_count(), 1);
        assert_eq!(outcome.conflicts[0].id.as_str(), "a");
        assert_eq!(replica.len(), 2);
        assert_eq!(replica.get(&"a".into()).unwrap().text, "Changed");
        assert_eq!(replica.get(&"b".into()).unwrap().source, Source::Server);
    }

    #[test]
    fn remote_wins_and_conflict_keeps_local_snapshot() {
        let mut replica = Replica::new();
        replica.add(RawQuote::new("A", "X").with_id("x")).unwrap();

        let outcome = merge(&mut replica, vec![remote("x", "B", "X")]);

        let stored = replica.get(&"x".into()).unwrap();
        assert_eq!(stored.text, "B");
        assert_eq!(stored.source, Source::Server);
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].local.text, "A");
        assert_eq!(outcome.conflicts[0].local.source, Source::Local);
        assert_eq!(outcome.conflicts[0].server.text, "B");
    }

    #[test]
    fn content_equal_only_refreshes_provenance() {
        let mut replica = local_replica();
        let incoming = remote("a", "Life...", "Life");
        let incoming_stamp = incoming.updated_at;

        let outcome = merge(&mut replica, vec![incoming]);

        assert!(outcome.is_noop());
        let stored = replica.get(&"a".into()).unwrap();
        assert_eq!(stored.source, Source::Server);
        assert_eq!(stored.updated_at, incoming_stamp);
    }

    #[test]
    fn merging_same_batch_twice_is_idempotent() {
        let mut replica = local_replica();
        let batch = vec![remote("a", "Changed", "Life"), remote("b", "New", "Life")];

        let first = merge(&mut replica, batch.clone());
        assert!(!first.is_noop());
        let after_first = replica.all().len();

        let second = merge(&mut replica, batch);
        assert_eq!(second.added, 0);
        assert_eq!(second.updated, 0);
        assert!(second.conflicts.is_empty());
        assert_eq!(replica.len(), after_first);
    }

    #[test]
    fn last_record_in_batch_wins_for_duplicate_ids() {
        let mut replica = Replica::new();
        let outcome = merge(
            &mut replica,
            vec![
                remote("x", "first", "Life"),
                remote("y", "other", "Life"),
                remote("x", "second", "Life"),
            ],
        );

        assert_eq!(outcome.added, 2);
        assert!(outcome.conflicts.is_empty());
        let ids = replica
            .all()
            .iter()
            .map(|quote| (quote.id.as_str(), quote.text.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![("x", "second"), ("y", "other")]);
    }

    #[test]
    fn merge_never_duplicates_ids() {
        let mut replica = local_replica();
        merge(
            &mut replica,
            vec![
                remote("a", "one", "Life"),
                remote("a", "two", "Life"),
                remote("c", "three", "Life"),
            ],
        );
        let mut ids = replica
            .all()
            .iter()
            .map(|quote| quote.id.clone())
            .collect::<Vec<_>>();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn invalid_remote_records_are_never_stored() {
        let mut replica = local_replica();
        let mut blank = remote("srv-9", "placeholder", "Life");
        blank.text = String::new();
        blank.category = String::new();
        let mut uncategorized = remote("a", "Changed", "Life");
        uncategorized.category = "  ".to_string();

        let outcome = merge(
            &mut replica,
            vec![blank, uncategorized, remote("b", "New", "Life")],
        );

        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.updated, 0);
        assert!(outcome.conflicts.is_empty());
        assert!(replica.get(&"srv-9".into()).is_none());
        assert_eq!(replica.get(&"a".into()).unwrap().text, "Life...");
        assert!(replica
            .all()
            .iter()
            .all(|quote| !quote.text.trim().is_empty() && !quote.category.trim().is_empty()));
    }
}
