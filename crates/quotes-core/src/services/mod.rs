//! Store object and its shared service handle.

mod book;
mod quote_service;

pub use book::{default_quotes, LoadOptions, QuoteBook};
pub use quote_service::QuoteService;
