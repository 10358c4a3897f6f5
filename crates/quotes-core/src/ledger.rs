//! Conflict ledger
//!
//! Open conflicts in detection order, at most one per quote id.

use chrono::Utc;
use serde_json::Value;

use crate::models::{Conflict, Quote, QuoteId, Resolution};
use crate::replica::Replica;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictLedger {
    entries: Vec<Conflict>,
}

impl ConflictLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from a persisted JSON blob.
    ///
    /// A blob that is not a JSON array starts an empty ledger. Entries that do
    /// not parse as conflicts are skipped, and repeated ids keep the latest
    /// entry.
    #[must_use]
    pub fn from_persisted(bytes: &[u8]) -> Self {
        let mut ledger = Self::new();
        let entries = match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                tracing::warn!("Persisted conflicts are not a list; starting with an empty ledger");
                return ledger;
            }
            Err(error) => {
                tracing::warn!("Discarding malformed persisted conflicts: {error}");
                return ledger;
            }
        };

        let total = entries.len();
        for entry in entries {
            if let Ok(conflict) = serde_json::from_value::<Conflict>(entry) {
                ledger.record(conflict);
            }
        }
        if ledger.len() < total {
            tracing::warn!(
                "Skipped {} unreadable persisted conflict(s)",
                total - ledger.len()
            );
        }
        ledger
    }

    /// Add `conflict`, replacing any open conflict for the same id.
    pub fn record(&mut self, conflict: Conflict) {
        self.entries.retain(|existing| existing.id != conflict.id);
        self.entries.push(conflict);
    }

    /// Open conflicts in detection order
    #[must_use]
    pub fn list(&self) -> &[Conflict] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: &QuoteId) -> Option<&Conflict> {
        self.entries.iter().find(|conflict| &conflict.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the chosen side of the conflict for `id` to `replica` and close
    /// the conflict.
    ///
    /// The chosen snapshot is written with a fresh `updated_at`; the quote is
    /// re-created if it is missing from the replica. Returns `None` (and
    /// changes nothing) when no conflict is open for `id`.
    pub fn resolve(
        &mut self,
        id: &QuoteId,
        choice: Resolution,
        replica: &mut Replica,
    ) -> Option<Quote> {
        let position = self.entries.iter().position(|conflict| &conflict.id == id)?;
        let conflict = self.entries.remove(position);

        let mut chosen = conflict.chosen(choice).clone();
        chosen.id = conflict.id.clone();
        chosen.updated_at = Utc::now();
        replica.upsert(chosen.clone());

        tracing::info!(id = %conflict.id, %choice, "Resolved conflict");
        Some(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;
    use crate::models::{RawQuote, Source};
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;

    fn remote(id: &str, text: &str) -> Quote {
        normalize(
            RawQuote::new(text, "Life")
                .with_id(id)
                .with_source(Source::Server),
            Source::Server,
        )
    }

    fn conflicted(local_text: &str, remote_text: &str) -> (Replica, ConflictLedger) {
        let mut replica = Replica::new();
        replica
            .add(RawQuote::new(local_text, "Life").with_id("x"))
            .unwrap();
        let mut ledger = ConflictLedger::new();
        for conflict in merge(&mut replica, vec![remote("x", remote_text)]).conflicts {
            ledger.record(conflict);
        }
        (replica, ledger)
    }

    #[test]
    fn resolve_local_restores_pre_merge_content() {
        let (mut replica, mut ledger) = conflicted("A", "B");
        assert_eq!(ledger.len(), 1);
        let original = ledger.get(&"x".into()).unwrap().local.clone();

        let resolved = ledger
            .resolve(&"x".into(), Resolution::Local, &mut replica)
            .unwrap();

        assert_eq!(resolved.text, "A");
        let stored = replica.get(&"x".into()).unwrap();
        assert!(stored.same_content(&original));
        assert_eq!(stored.source, Source::Local);
        assert!(stored.updated_at >= original.updated_at);
        assert!(ledger.is_empty());
        assert!(ledger.list().is_empty());
    }

    #[test]
    fn resolve_server_keeps_remote_content() {
        let (mut replica, mut ledger) = conflicted("A", "B");
        ledger.resolve(&"x".into(), Resolution::Server, &mut replica);
        assert_eq!(replica.get(&"x".into()).unwrap().text, "B");
        assert!(ledger.is_empty());
    }

    #[test]
    fn resolve_unknown_id_is_noop() {
        let (mut replica, mut ledger) = conflicted("A", "B");
        let before = replica.clone();
        assert!(ledger
            .resolve(&"missing".into(), Resolution::Local, &mut replica)
            .is_none());
        assert_eq!(replica, before);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn resolve_recreates_missing_quote() {
        let (_, mut ledger) = conflicted("A", "B");
        let mut empty = Replica::new();
        ledger.resolve(&"x".into(), Resolution::Local, &mut empty);
        assert_eq!(empty.len(), 1);
        assert_eq!(empty.get(&"x".into()).unwrap().text, "A");
    }

    #[test]
    fn record_keeps_one_conflict_per_id() {
        let (mut replica, mut ledger) = conflicted("A", "B");
        for conflict in merge(&mut replica, vec![remote("x", "C")]).conflicts {
            ledger.record(conflict);
        }

        assert_eq!(ledger.len(), 1);
        let open = ledger.get(&"x".into()).unwrap();
        assert_eq!(open.local.text, "B");
        assert_eq!(open.server.text, "C");
    }

    #[test]
    fn record_orders_by_detection() {
        let mut ledger = ConflictLedger::new();
        let a = Conflict::new(remote("a", "1"), remote("a", "2"));
        let b = Conflict::new(remote("b", "1"), remote("b", "2"));
        ledger.record(a.clone());
        ledger.record(b);
        ledger.record(a);

        let ids = ledger
            .list()
            .iter()
            .map(|conflict| conflict.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn from_persisted_round_trips_and_tolerates_garbage() {
        let (_, ledger) = conflicted("A", "B");
        let bytes = serde_json::to_vec(ledger.list()).unwrap();
        assert_eq!(ConflictLedger::from_persisted(&bytes), ledger);

        assert!(ConflictLedger::from_persisted(b"not json").is_empty());
        assert!(ConflictLedger::from_persisted(b"{\"id\":\"x\"}").is_empty());
        assert!(ConflictLedger::from_persisted(b"[{\"id\":\"x\"}]").is_empty());
    }
}
