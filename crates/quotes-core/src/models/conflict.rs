//! Sync conflict model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::quote::{Quote, QuoteId};

/// Divergence between the local and remote value of one quote, detected
/// during a merge. The remote value has already been applied; the local
/// snapshot is kept so the user can revert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Contested quote id
    pub id: QuoteId,
    /// Local value just before the remote value overwrote it
    pub local: Quote,
    /// Remote value that was applied
    pub server: Quote,
    /// Detection time
    pub timestamp: DateTime<Utc>,
}

impl Conflict {
    #[must_use]
    pub fn new(local: Quote, server: Quote) -> Self {
        Self {
            id: server.id.clone(),
            local,
            server,
            timestamp: Utc::now(),
        }
    }

    /// Snapshot matching the given choice
    #[must_use]
    pub const fn chosen(&self, choice: Resolution) -> &Quote {
        match choice {
            Resolution::Local => &self.local,
            Resolution::Server => &self.server,
        }
    }
}

/// Which side of a conflict to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Local,
    Server,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Server => f.write_str("server"),
        }
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "server" | "remote" => Ok(Self::Server),
            other => Err(format!("unknown resolution '{other}' (expected local or server)")),
        }
    }
}
