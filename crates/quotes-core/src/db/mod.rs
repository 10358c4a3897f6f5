//! Database layer for Quotes

mod blob_repository;
mod connection;
mod migrations;

pub use blob_repository::LibSqlBlobStore;
pub use connection::Database;
