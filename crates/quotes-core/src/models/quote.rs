//! Quote model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Author assigned when a record does not carry one
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Category assigned when a record does not carry one
pub const DEFAULT_CATEGORY: &str = "General";

/// Prefix for ids that come from the remote feed
pub const REMOTE_ID_PREFIX: &str = "srv";

/// Where a quote last came from authoritatively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Authored on this client (typed in or imported)
    #[default]
    Local,
    /// Delivered by the remote feed
    Server,
}

impl Source {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "server" => Ok(Self::Server),
            other => Err(format!("unknown quote source '{other}'")),
        }
    }
}

/// Identifier of a quote within the replica.
///
/// Generated ids are namespaced by the source that created them
/// (`local-<uuid>` / `server-<uuid>`); ids assigned by the remote adapter use
/// the `srv-` namespace, so locally generated ids never collide with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    /// Generate a fresh id in the namespace of `source`.
    ///
    /// UUID v7 is time-ordered with a random tail, which keeps generated ids
    /// unique across calls within the process.
    #[must_use]
    pub fn generate(source: Source) -> Self {
        Self(format!("{}-{}", source.as_str(), Uuid::now_v7()))
    }

    /// Id for a record delivered by the remote feed
    #[must_use]
    pub fn remote(remote_id: impl fmt::Display) -> Self {
        Self(format!("{REMOTE_ID_PREFIX}-{remote_id}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id lives in the remote namespace
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.0
            .strip_prefix(REMOTE_ID_PREFIX)
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for QuoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A normalized quote held by the replica
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Unique identifier
    pub id: QuoteId,
    /// Quote body
    pub text: String,
    /// Attribution
    pub author: String,
    /// Grouping used for filtering
    pub category: String,
    /// When this value was last stamped (provenance only)
    pub updated_at: DateTime<Utc>,
    /// Where the value last came from
    pub source: Source,
}

impl Quote {
    /// Compare the user-visible content, ignoring `updated_at` and `source`.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.text == other.text && self.author == other.author && self.category == other.category
    }

    /// One-line rendering used by list views
    #[must_use]
    pub fn display_line(&self) -> String {
        format!("\"{}\" — {} [{}]", self.text, self.author, self.category)
    }
}

/// A partially populated quote, as found in storage, import files, or remote
/// payloads. Every field is optional; the normalizer fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawQuote {
    pub id: Option<String>,
    pub text: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub updated_at: Option<String>,
    pub source: Option<String>,
}

impl RawQuote {
    /// Raw record with only text and category set
    #[must_use]
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            category: Some(category.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source.as_str().to_string());
        self
    }

    /// Build a raw record from arbitrary JSON without failing.
    ///
    /// Fields of the wrong type are treated as absent; numeric ids are
    /// stringified. Non-object values produce an empty record.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let text_field = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            id: object.get("id").and_then(scalar_to_string),
            text: text_field("text"),
            author: text_field("author"),
            category: text_field("category"),
            updated_at: text_field("updatedAt"),
            source: text_field("source"),
        }
    }
}

impl From<&Quote> for RawQuote {
    fn from(quote: &Quote) -> Self {
        Self {
            id: Some(quote.id.to_string()),
            text: Some(quote.text.clone()),
            author: Some(quote.author.clone()),
            category: Some(quote.category.clone()),
            updated_at: Some(quote.updated_at.to_rfc3339()),
            source: Some(quote.source.as_str().to_string()),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
