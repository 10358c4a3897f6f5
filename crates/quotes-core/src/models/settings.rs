//! Persisted view preferences

use serde::{Deserialize, Serialize};

/// Filter value meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// Category selected for list views, remembered across runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    /// Show every quote
    #[default]
    All,
    /// Show only quotes in this category
    Category(String),
}

impl CategoryFilter {
    /// Build a filter from user input; blank input and `all` clear the filter.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    /// Stored representation (`all` or the category name)
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(category) => category,
        }
    }

    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(selected) => selected == category,
        }
    }
}
