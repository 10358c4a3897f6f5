//! Remote snapshot read from a JSON file.
//!
//! Lets a client reconcile against an exported collection (another machine's
//! `quotes export`, a shared drive) the same way it would against the feed.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{FetchError, FetchResult, RemoteSource};
use crate::models::{QuoteId, RawQuote, Source};

#[derive(Debug, Clone)]
pub struct FileRemoteSource {
    path: PathBuf,
}

impl FileRemoteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RemoteSource for FileRemoteSource {
    async fn fetch(&self) -> FetchResult<Vec<RawQuote>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let payload = serde_json::from_slice::<Value>(&bytes).map_err(|error| {
            FetchError::InvalidPayload(format!("{} is not JSON: {error}", self.path.display()))
        })?;
        let Value::Array(entries) = payload else {
            return Err(FetchError::InvalidPayload(format!(
                "{} does not hold a JSON array",
                self.path.display()
            )));
        };

        Ok(entries.iter().filter_map(snapshot_entry).collect())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Re-tag one snapshot entry as a server record in the remote id namespace.
/// Entries without an id cannot be matched across syncs and are skipped.
fn snapshot_entry(value: &Value) -> Option<RawQuote> {
    let mut raw = RawQuote::from_json(value);
    let id = raw.id.take()?;
    let id = QuoteId::from(id.trim());
    if id.as_str().is_empty() {
        return None;
    }

    raw.id = Some(if id.is_remote() {
        id.to_string()
    } else {
        QuoteId::remote(&id).to_string()
    });
    raw.source = Some(Source::Server.as_str().to_string());
    Some(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn fetch_namespaces_ids_and_marks_server() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("snapshot.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "srv-1", "text": "Kept id", "category": "Life", "source": "local"},
                {"id": "local-abc", "text": "Renamed", "category": "Life"},
                {"text": "No identity", "category": "Life"}
            ]"#,
        )
        .unwrap();

        let raws = FileRemoteSource::new(&path).fetch().await.unwrap();

        let ids = raws
            .iter()
            .map(|raw| raw.id.clone().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["srv-1", "srv-local-abc"]);
        assert!(raws
            .iter()
            .all(|raw| raw.source.as_deref() == Some("server")));
    }

    #[tokio::test]
    async fn fetch_rejects_non_list_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("snapshot.json");
        std::fs::write(&path, r#"{"quotes": []}"#).unwrap();

        let error = FileRemoteSource::new(&path).fetch().await.unwrap_err();
        assert!(matches!(error, FetchError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn fetch_reports_missing_file() {
        let tmp = tempdir().unwrap();
        let error = FileRemoteSource::new(tmp.path().join("absent.json"))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(error, FetchError::Io(_)));
    }
}
