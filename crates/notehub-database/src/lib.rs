//! # notehub-database
//!
//! The record-access layer: the [`DocumentRecords`] seam the sync
//! coordinator persists through, its concrete PostgreSQL implementation,
//! and a dashmap-backed in-memory implementation for tests and headless
//! embeddings.

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod records;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryRecords;
pub use postgres::PgRecords;
pub use records::DocumentRecords;
