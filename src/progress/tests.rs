//! Tests for ProgressComputer

use super::*;
use crate::error::{Error, Result};
use crate::executor::{FixedCursorResolver, QueryExecutor};
use crate::query::{
    build_max_ordered_column_query, build_max_value_query, build_size_estimate_query,
};
use crate::types::{Dialect, JsonValue, StreamKey, TableSizeInfo};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

fn orders() -> StreamKey {
    StreamKey::new("orders", "public")
}

fn users() -> StreamKey {
    StreamKey::new("users", "public")
}

// ============================================================================
// Scripted Executor
// ============================================================================

/// Executor answering exact SQL strings from a canned map; any other query
/// fails, which doubles as the connectivity-failure case.
#[derive(Default)]
struct ScriptedExecutor {
    responses: Mutex<HashMap<String, Vec<JsonValue>>>,
}

impl ScriptedExecutor {
    fn new() -> Self {
        Self::default()
    }

    fn with_response(self, sql: impl Into<String>, rows: Vec<JsonValue>) -> Self {
        self.responses.lock().unwrap().insert(sql.into(), rows);
        self
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn query(&self, sql: &str) -> Result<Vec<JsonValue>> {
        self.responses
            .lock()
            .unwrap()
            .get(sql)
            .cloned()
            .ok_or_else(|| Error::query(format!("connection refused for: {sql}")))
    }
}

fn max_cursor_sql(field: &str) -> String {
    build_max_value_query(&format!("\"{field}\""), "\"public\".\"orders\"").sql
}

fn max_ordered_sql(field: &str) -> String {
    build_max_ordered_column_query(&format!("\"{field}\""), "\"public\".\"orders\"").sql
}

// ============================================================================
// Max Cursor Value Tests
// ============================================================================

#[tokio::test]
async fn test_max_cursor_value_single_row() {
    let executor = ScriptedExecutor::new().with_response(
        max_cursor_sql("updated_at"),
        vec![json!({"max_cursor_val": "2024-06-01"})],
    );
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    let bound = computer
        .max_cursor_value(&orders(), "updated_at")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(bound.value, "2024-06-01");
    assert_eq!(bound.record_count, 1);
}

#[tokio::test]
async fn test_max_cursor_value_counts_ties() {
    // Three rows share the maximum value; the count must be exactly 3
    let executor = ScriptedExecutor::new().with_response(
        max_cursor_sql("updated_at"),
        vec![
            json!({"max_cursor_val": "2024-06-01"}),
            json!({"max_cursor_val": "2024-06-01"}),
            json!({"max_cursor_val": "2024-06-01"}),
        ],
    );
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    let bound = computer
        .max_cursor_value(&orders(), "updated_at")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(bound.record_count, 3);
}

#[tokio::test]
async fn test_max_cursor_value_empty_table() {
    let executor = ScriptedExecutor::new().with_response(max_cursor_sql("updated_at"), vec![]);
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    let bound = computer
        .max_cursor_value(&orders(), "updated_at")
        .await
        .unwrap();

    assert_eq!(bound, None);
}

#[tokio::test]
async fn test_max_cursor_value_numeric_rendered_as_text() {
    let executor = ScriptedExecutor::new()
        .with_response(max_cursor_sql("id"), vec![json!({"max_cursor_val": 500})]);
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    let bound = computer
        .max_cursor_value(&orders(), "id")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(bound.value, "500");
}

#[tokio::test]
async fn test_max_cursor_value_query_failure_is_fatal() {
    let computer = ProgressComputer::for_dialect(ScriptedExecutor::new(), Dialect::Postgres);

    let result = computer.max_cursor_value(&orders(), "updated_at").await;

    let error = result.unwrap_err();
    assert!(!error.is_configuration());
    assert!(error.to_string().contains("connection refused"));
}

// ============================================================================
// Max Ordered-Column Value Tests
// ============================================================================

#[tokio::test]
async fn test_max_ordered_column_value() {
    let executor = ScriptedExecutor::new()
        .with_response(max_ordered_sql("id"), vec![json!({"max_ordered_col": 500})]);
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    let max = computer
        .max_ordered_column_value(&orders(), "id")
        .await
        .unwrap();

    assert_eq!(max, Some("500".to_string()));
}

#[tokio::test]
async fn test_max_ordered_column_value_null_means_empty_table() {
    let executor = ScriptedExecutor::new()
        .with_response(max_ordered_sql("id"), vec![json!({"max_ordered_col": null})]);
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    let max = computer
        .max_ordered_column_value(&orders(), "id")
        .await
        .unwrap();

    assert_eq!(max, None);
}

#[tokio::test]
async fn test_max_ordered_column_value_rejects_unexpected_shape() {
    // An aggregate query must return exactly one row
    let executor = ScriptedExecutor::new().with_response(
        max_ordered_sql("id"),
        vec![
            json!({"max_ordered_col": 1}),
            json!({"max_ordered_col": 2}),
        ],
    );
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    let result = computer.max_ordered_column_value(&orders(), "id").await;

    assert!(matches!(
        result.unwrap_err(),
        Error::UnexpectedResultShape { .. }
    ));
}

// ============================================================================
// Cursor-Based Status Tests
// ============================================================================

#[tokio::test]
async fn test_cursor_based_status() {
    let executor = ScriptedExecutor::new().with_response(
        max_cursor_sql("updated_at"),
        vec![
            json!({"max_cursor_val": "2024-06-01"}),
            json!({"max_cursor_val": "2024-06-01"}),
        ],
    );
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);
    let resolver = FixedCursorResolver::default().with_field(orders(), "updated_at");

    let status = computer
        .cursor_based_status(&orders(), &resolver)
        .await
        .unwrap();

    assert_eq!(status.stream_name, "orders");
    assert_eq!(status.stream_namespace, "public");
    assert_eq!(status.field(), Some("updated_at"));
    assert_eq!(status.cursor, Some("2024-06-01".to_string()));
    assert_eq!(status.cursor_record_count, 2);
}

#[tokio::test]
async fn test_cursor_based_status_empty_table() {
    let executor = ScriptedExecutor::new().with_response(max_cursor_sql("updated_at"), vec![]);
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);
    let resolver = FixedCursorResolver::default().with_field(orders(), "updated_at");

    let status = computer
        .cursor_based_status(&orders(), &resolver)
        .await
        .unwrap();

    // Never a null-valued watermark: the cursor is absent, not null
    assert_eq!(status.cursor, None);
    assert_eq!(status.cursor_record_count, 0);
    let serialized = serde_json::to_value(&status).unwrap();
    assert!(serialized.get("cursor").is_none());
}

#[tokio::test]
async fn test_cursor_based_status_missing_cursor_is_fatal_config_error() {
    let computer = ProgressComputer::for_dialect(ScriptedExecutor::new(), Dialect::Postgres);
    let resolver = FixedCursorResolver::default();

    let error = computer
        .cursor_based_status(&orders(), &resolver)
        .await
        .unwrap_err();

    assert!(error.is_configuration());
    assert!(matches!(error, Error::MissingCursorField { .. }));
}

#[tokio::test]
async fn test_cursor_based_statuses_isolate_stream_failures() {
    // orders resolves and succeeds; users has no cursor configured
    let executor = ScriptedExecutor::new().with_response(
        max_cursor_sql("updated_at"),
        vec![json!({"max_cursor_val": "2024-06-01"})],
    );
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);
    let resolver = FixedCursorResolver::default().with_field(orders(), "updated_at");

    let statuses = computer
        .cursor_based_statuses(&[orders(), users()], &resolver)
        .await;

    assert_eq!(statuses.len(), 2);
    assert!(statuses[&orders()].is_ok());
    assert!(statuses[&users()]
        .as_ref()
        .is_err_and(Error::is_configuration));
}

// ============================================================================
// Size Estimate Tests
// ============================================================================

fn size_sql() -> String {
    build_size_estimate_query(Dialect::Postgres, "public", "orders").sql
}

#[tokio::test]
async fn test_table_size_estimate() {
    let executor = ScriptedExecutor::new().with_response(
        size_sql(),
        vec![json!({"total_size_bytes": 1_048_576, "avg_row_length_bytes": 128})],
    );
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    let estimate = computer.table_size_estimate(&orders()).await;

    assert_eq!(estimate, Some(TableSizeInfo::new(1_048_576, 128)));
}

#[tokio::test]
async fn test_table_size_estimate_zero_rows_is_unknown() {
    let executor = ScriptedExecutor::new().with_response(size_sql(), vec![]);
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    assert_eq!(computer.table_size_estimate(&orders()).await, None);
}

#[tokio::test]
async fn test_table_size_estimate_null_metadata_is_unknown() {
    let executor = ScriptedExecutor::new().with_response(
        size_sql(),
        vec![json!({"total_size_bytes": null, "avg_row_length_bytes": null})],
    );
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    assert_eq!(computer.table_size_estimate(&orders()).await, None);
}

#[tokio::test]
async fn test_table_size_estimate_query_error_is_unknown_not_fatal() {
    let computer = ProgressComputer::for_dialect(ScriptedExecutor::new(), Dialect::Postgres);

    // The executor fails every query; the estimate degrades instead of erroring
    assert_eq!(computer.table_size_estimate(&orders()).await, None);
}

#[tokio::test]
async fn test_table_size_estimates_skip_unknown_streams() {
    let executor = ScriptedExecutor::new().with_response(
        size_sql(),
        vec![json!({"total_size_bytes": 4096, "avg_row_length_bytes": 64})],
    );
    let computer = ProgressComputer::for_dialect(executor, Dialect::Postgres);

    let estimates = computer.table_size_estimates(&[orders(), users()]).await;

    assert_eq!(estimates.len(), 1);
    assert_eq!(estimates[&orders()], TableSizeInfo::new(4096, 64));
    assert!(!estimates.contains_key(&users()));
}

// ============================================================================
// Index Diagnostics Tests
// ============================================================================

#[tokio::test]
async fn test_log_index_info_absorbs_failures() {
    // Every lookup fails; diagnostics must not propagate anything
    let computer = ProgressComputer::for_dialect(ScriptedExecutor::new(), Dialect::Postgres);
    computer.log_index_info(&[orders(), users()]).await;
}

// ============================================================================
// Load Strategy Tests
// ============================================================================

#[test]
fn test_load_strategy_unknown_estimate_is_single_pass() {
    assert_eq!(
        LoadStrategy::for_estimate(None, 1_048_576),
        LoadStrategy::SinglePass
    );
}

#[test]
fn test_load_strategy_small_table_is_single_pass() {
    let info = TableSizeInfo::new(4096, 64);
    assert_eq!(
        LoadStrategy::for_estimate(Some(&info), 1_048_576),
        LoadStrategy::SinglePass
    );
}

#[test]
fn test_load_strategy_zero_row_length_is_single_pass() {
    let info = TableSizeInfo::new(10_000_000, 0);
    assert_eq!(
        LoadStrategy::for_estimate(Some(&info), 1_048_576),
        LoadStrategy::SinglePass
    );
}

#[test]
fn test_load_strategy_large_table_is_chunked() {
    let info = TableSizeInfo::new(100 * 1_048_576, 128);
    assert_eq!(
        LoadStrategy::for_estimate(Some(&info), 1_048_576),
        LoadStrategy::Chunked {
            chunk_size_rows: 8192
        }
    );
}
