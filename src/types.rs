//! Common types used throughout Relsync
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Stream Identity
// ============================================================================

/// Identifies a stream by name and namespace (schema).
///
/// Equality is exact and case-sensitive on both fields, as configured by the
/// catalog. Used as the map key everywhere per-stream state is held.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamKey {
    /// Stream (table) name
    pub name: String,
    /// Stream namespace (schema)
    pub namespace: String,
}

impl StreamKey {
    /// Create a new stream key
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

// ============================================================================
// SQL Dialect
// ============================================================================

/// SQL dialect for metadata-catalog queries.
///
/// The max-value queries are plain SQL and dialect-independent; size-estimate
/// and index-lookup queries read engine-specific catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Microsoft SQL Server
    Mssql,
    /// PostgreSQL
    #[default]
    Postgres,
    /// MySQL / MariaDB
    Mysql,
}

impl Dialect {
    /// Default identifier quote string for the dialect
    pub fn quote_string(self) -> &'static str {
        match self {
            Dialect::Mssql => "\"",
            Dialect::Postgres => "\"",
            Dialect::Mysql => "`",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Mssql => write!(f, "mssql"),
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Mysql => write!(f, "mysql"),
        }
    }
}

// ============================================================================
// Table Size Estimate
// ============================================================================

/// Table size estimate read from the engine's metadata catalogs.
///
/// An estimate, not an exact count. Used only to pick a chunking strategy,
/// never for correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSizeInfo {
    /// Estimated total table size in bytes
    pub table_size_bytes: u64,
    /// Estimated average row length in bytes
    pub avg_row_length_bytes: u64,
}

impl TableSizeInfo {
    /// Create a new size estimate
    pub fn new(table_size_bytes: u64, avg_row_length_bytes: u64) -> Self {
        Self {
            table_size_bytes,
            avg_row_length_bytes,
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
