//! Reference query executor via DuckDB
//!
//! Implements the [`crate::executor::QueryExecutor`] seam with DuckDB as the
//! query engine. DuckDB can attach PostgreSQL, MySQL and SQLite databases
//! read-only, so embedders without their own driver can still compute sync
//! bounds against a live source.

mod engine;

pub use engine::{DuckDbExecutor, SourceDatabase};
