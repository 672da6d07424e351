//! Progress computer
//!
//! Executes the bound and metadata queries through the caller-supplied
//! [`QueryExecutor`] and maps their result rows into typed bounds. Query
//! failures on required bounds are fatal for the affected stream; metadata
//! failures degrade to "unknown".

use crate::error::{Error, Result};
use crate::executor::{CursorResolver, QueryExecutor};
use crate::query::{
    build_index_lookup_query, build_max_ordered_column_query, build_max_value_query,
    build_size_estimate_query, qualified_table_name, quote_identifier, INDEX_DESCRIPTION_COL,
    INDEX_KEYS_COL, INDEX_NAME_COL,
};
use crate::state::CursorBasedStatus;
use crate::types::{Dialect, JsonValue, StreamKey, TableSizeInfo};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ============================================================================
// Cursor Bound
// ============================================================================

/// Result of a max-value computation: the textual maximum plus the number of
/// rows tied at it.
///
/// Ties matter: rows sharing the maximum cursor value are not otherwise
/// distinguishable from one another, so a resumed sync must treat all of them
/// as already synced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorBound {
    /// The maximum value, as text
    pub value: String,
    /// Number of rows whose value equals the maximum
    pub record_count: u64,
}

// ============================================================================
// Progress Computer
// ============================================================================

/// Computes sync bounds and size estimates for configured streams.
///
/// Holds the query executor, the SQL dialect for metadata queries, and the
/// identifier quote string. Comparison and ordering of cursor values is
/// performed by the database via the max-value queries; the computer never
/// recomputes ordering client-side.
#[derive(Debug, Clone)]
pub struct ProgressComputer<E> {
    executor: E,
    dialect: Dialect,
    quote: String,
}

impl<E: QueryExecutor> ProgressComputer<E> {
    /// Create a computer with an explicit identifier quote string
    pub fn new(executor: E, dialect: Dialect, quote: impl Into<String>) -> Self {
        Self {
            executor,
            dialect,
            quote: quote.into(),
        }
    }

    /// Create a computer using the dialect's default quote string
    pub fn for_dialect(executor: E, dialect: Dialect) -> Self {
        let quote = dialect.quote_string().to_string();
        Self {
            executor,
            dialect,
            quote,
        }
    }

    /// The SQL dialect metadata queries are built for
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    // ========================================================================
    // Bound Computation
    // ========================================================================

    /// Compute the maximum cursor value for a stream, with its tie count.
    ///
    /// Returns `Ok(None)` when the result set is empty (an empty table):
    /// there is no defined maximum and nothing to sync. A query failure is
    /// fatal for this stream and propagates unmodified; there is no internal
    /// retry.
    pub async fn max_cursor_value(
        &self,
        stream: &StreamKey,
        cursor_field: &str,
    ) -> Result<Option<CursorBound>> {
        let table = qualified_table_name(&stream.namespace, &stream.name, &self.quote);
        let column = quote_identifier(cursor_field, &self.quote);
        let query = build_max_value_query(&column, &table);

        info!("Querying max cursor value for {stream}");
        debug!("Max cursor value query: {}", query.sql);

        let rows = self.executor.query(&query.sql).await?;
        if rows.is_empty() {
            info!("No maximum cursor value for {stream}; table appears empty");
            return Ok(None);
        }

        let value = match rows[0].get(&query.result_column) {
            None => {
                return Err(Error::unexpected_shape(format!(
                    "max cursor value result for {stream} is missing column '{}'",
                    query.result_column
                )))
            }
            Some(JsonValue::Null) => return Ok(None),
            Some(value) => json_value_as_text(value),
        };

        Ok(Some(CursorBound {
            value,
            record_count: rows.len() as u64,
        }))
    }

    /// Compute the maximum ordered-column value for a stream's initial load.
    ///
    /// Returns `Ok(None)` for a `NULL` maximum (an empty table) so downstream
    /// code cannot accidentally treat null as a valid boundary.
    pub async fn max_ordered_column_value(
        &self,
        stream: &StreamKey,
        ordered_column: &str,
    ) -> Result<Option<String>> {
        let table = qualified_table_name(&stream.namespace, &stream.name, &self.quote);
        let column = quote_identifier(ordered_column, &self.quote);
        let query = build_max_ordered_column_query(&column, &table);

        info!("Querying max ordered-column value for {stream}");
        debug!("Max ordered-column query: {}", query.sql);

        let rows = self.executor.query(&query.sql).await?;
        if rows.len() != 1 {
            return Err(Error::unexpected_shape(format!(
                "max ordered-column query for {stream} returned {} rows, expected 1",
                rows.len()
            )));
        }

        match rows[0].get(&query.result_column) {
            None | Some(JsonValue::Null) => {
                info!("Max ordered-column value is null for {stream}; this could indicate an empty table");
                Ok(None)
            }
            Some(value) => Ok(Some(json_value_as_text(value))),
        }
    }

    // ========================================================================
    // Cursor-Based Statuses
    // ========================================================================

    /// Compute the cursor-based sync status for one stream.
    ///
    /// The stream must already have a resolved cursor field; a missing
    /// resolution is a fatal configuration error, never a silent skip. For an
    /// empty table the status carries no cursor value and a zero record
    /// count.
    pub async fn cursor_based_status<R: CursorResolver + ?Sized>(
        &self,
        stream: &StreamKey,
        resolver: &R,
    ) -> Result<CursorBasedStatus> {
        let cursor_field = resolver
            .cursor_field(stream)
            .ok_or_else(|| Error::missing_cursor(stream.to_string()))?;

        let status = CursorBasedStatus::new(stream, &cursor_field);
        match self.max_cursor_value(stream, &cursor_field).await? {
            Some(bound) => Ok(status.with_bound(bound.value, bound.record_count)),
            None => Ok(status),
        }
    }

    /// Compute cursor-based sync statuses for a set of streams.
    ///
    /// Streams are computed independently and may overlap in time. Outcomes
    /// are per stream: a fatal error (missing cursor, query failure) aborts
    /// only the affected stream's entry and is surfaced in the map, leaving
    /// the other streams' statuses intact.
    pub async fn cursor_based_statuses<R: CursorResolver + ?Sized>(
        &self,
        streams: &[StreamKey],
        resolver: &R,
    ) -> HashMap<StreamKey, Result<CursorBasedStatus>> {
        let outcomes = join_all(
            streams
                .iter()
                .map(|stream| self.cursor_based_status(stream, resolver)),
        )
        .await;

        let mut statuses = HashMap::new();
        for (stream, outcome) in streams.iter().zip(outcomes) {
            if let Err(error) = &outcome {
                tracing::error!("Failed to compute cursor-based status for {stream}: {error}");
            }
            statuses.insert(stream.clone(), outcome);
        }
        statuses
    }

    // ========================================================================
    // Size Estimates
    // ========================================================================

    /// Estimate table size for a stream from the engine's metadata catalogs.
    ///
    /// Returns `None` when metadata is unavailable (zero rows, null columns)
    /// or when the estimate query fails; an estimation error is caught and
    /// logged for this one stream and never aborts the sync.
    pub async fn table_size_estimate(&self, stream: &StreamKey) -> Option<TableSizeInfo> {
        let query = build_size_estimate_query(self.dialect, &stream.namespace, &stream.name);
        debug!("Size estimate query for {stream}: {}", query.sql);

        let rows = match self.executor.query(&query.sql).await {
            Ok(rows) => rows,
            Err(error) => {
                warn!("Error occurred while attempting to estimate sync size for {stream}: {error}");
                return None;
            }
        };

        let row = rows.first()?;
        let table_size_bytes = row.get(&query.size_column).and_then(json_value_as_u64)?;
        let avg_row_length_bytes = row.get(&query.avg_row_column).and_then(json_value_as_u64)?;

        info!(
            "Stream {stream} size estimate is {table_size_bytes}, average row size estimate is {avg_row_length_bytes}"
        );
        Some(TableSizeInfo::new(table_size_bytes, avg_row_length_bytes))
    }

    /// Estimate table sizes for a set of streams.
    ///
    /// Estimates run independently per stream and may overlap in time.
    /// Streams with no available estimate are simply absent from the map.
    pub async fn table_size_estimates(
        &self,
        streams: &[StreamKey],
    ) -> HashMap<StreamKey, TableSizeInfo> {
        let estimates = join_all(streams.iter().map(|stream| self.table_size_estimate(stream))).await;

        streams
            .iter()
            .zip(estimates)
            .filter_map(|(stream, estimate)| estimate.map(|e| (stream.clone(), e)))
            .collect()
    }

    // ========================================================================
    // Index Diagnostics
    // ========================================================================

    /// Log index name/description/key-columns for each stream's table.
    ///
    /// Diagnostic only: a lookup failure is logged as "no index found" and
    /// never propagated.
    pub async fn log_index_info(&self, streams: &[StreamKey]) {
        for stream in streams {
            info!(
                "Discovering indexes for schema \"{}\", table \"{}\"",
                stream.namespace, stream.name
            );
            let query = build_index_lookup_query(self.dialect, &stream.namespace, &stream.name);
            debug!("Index lookup query: {}", query.sql);

            match self.executor.query(&query.sql).await {
                Ok(rows) if !rows.is_empty() => {
                    for row in &rows {
                        info!(
                            "Index: name: {}. description: {}. keys: {}.",
                            row.get(INDEX_NAME_COL).unwrap_or(&JsonValue::Null),
                            row.get(INDEX_DESCRIPTION_COL).unwrap_or(&JsonValue::Null),
                            row.get(INDEX_KEYS_COL).unwrap_or(&JsonValue::Null)
                        );
                    }
                }
                Ok(_) | Err(_) => info!("No index found for {stream}"),
            }
        }
    }
}

// ============================================================================
// Load Strategy
// ============================================================================

/// How to run a stream's initial load, decided from its size estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Read the table in one pass
    SinglePass,
    /// Page through the table in chunks of roughly this many rows
    Chunked {
        /// Rows per chunk
        chunk_size_rows: u64,
    },
}

impl LoadStrategy {
    /// Pick a strategy for a table given its size estimate and the target
    /// chunk size in bytes.
    ///
    /// An unknown estimate, a zero average row length, or a table smaller
    /// than one chunk all yield [`LoadStrategy::SinglePass`] - the estimate
    /// only tunes the plan, it never gates correctness.
    pub fn for_estimate(estimate: Option<&TableSizeInfo>, target_chunk_bytes: u64) -> Self {
        match estimate {
            Some(info)
                if info.avg_row_length_bytes > 0 && info.table_size_bytes > target_chunk_bytes =>
            {
                Self::Chunked {
                    chunk_size_rows: (target_chunk_bytes / info.avg_row_length_bytes).max(1),
                }
            }
            _ => Self::SinglePass,
        }
    }
}

// ============================================================================
// Row Value Helpers
// ============================================================================

/// Render a result-row value as text, the way cursor values are carried.
fn json_value_as_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read a result-row value as an unsigned integer, tolerating numeric strings
/// and floating-point estimates.
fn json_value_as_u64(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    }
}
