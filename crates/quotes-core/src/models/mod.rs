//! Data models for Quotes

mod conflict;
mod quote;
mod settings;

pub use conflict::{Conflict, Resolution};
pub use quote::{
    Quote, QuoteId, RawQuote, Source, DEFAULT_AUTHOR, DEFAULT_CATEGORY, REMOTE_ID_PREFIX,
};
pub use settings::{CategoryFilter, ALL_CATEGORIES};
