//! Query-text builders
//!
//! Each builder returns the SQL plus the result-column alias(es) the caller
//! reads from the returned rows, so row access never depends on how an engine
//! case-folds unaliased columns.

use crate::types::Dialect;

/// Alias for the maximum cursor value column in max-value query results
pub const MAX_CURSOR_COL: &str = "max_cursor_val";

/// Alias for the maximum ordered-column value in max-value query results
pub const MAX_ORDERED_COL: &str = "max_ordered_col";

/// Alias for the total table size column in size-estimate results
pub const TABLE_SIZE_BYTES_COL: &str = "total_size_bytes";

/// Alias for the average row length column in size-estimate results
pub const AVG_ROW_LENGTH_COL: &str = "avg_row_length_bytes";

/// Index name column in index-lookup results
pub const INDEX_NAME_COL: &str = "index_name";

/// Index description column in index-lookup results
pub const INDEX_DESCRIPTION_COL: &str = "index_description";

/// Index key-columns column in index-lookup results
pub const INDEX_KEYS_COL: &str = "index_keys";

// ============================================================================
// Identifier Quoting
// ============================================================================

/// Wrap an identifier in the given quote string.
///
/// No escaping and no validation: the identifier is assumed to come from the
/// configured catalog, and a malformed one propagates as a syntax error from
/// the database.
pub fn quote_identifier(identifier: &str, quote: &str) -> String {
    format!("{quote}{identifier}{quote}")
}

/// Build a fully qualified, quoted table name from namespace and name.
///
/// An empty namespace yields just the quoted table name.
pub fn qualified_table_name(namespace: &str, name: &str, quote: &str) -> String {
    if namespace.is_empty() {
        quote_identifier(name, quote)
    } else {
        format!(
            "{}.{}",
            quote_identifier(namespace, quote),
            quote_identifier(name, quote)
        )
    }
}

// ============================================================================
// Max-Value Queries
// ============================================================================

/// A max-value query plus the column to read from its result rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxValueQuery {
    /// Finalized SQL text
    pub sql: String,
    /// Result column holding the value
    pub result_column: String,
}

/// Build the query selecting the row(s) tied at the table-wide maximum of
/// `column`.
///
/// Returns every row whose `column` equals the maximum, so the caller can
/// count ties at the watermark. `column` and `table` must already be
/// identifier-quoted.
pub fn build_max_value_query(column: &str, table: &str) -> MaxValueQuery {
    MaxValueQuery {
        sql: format!(
            "SELECT {column} AS {MAX_CURSOR_COL} FROM {table} \
             WHERE {column} = (SELECT MAX({column}) FROM {table})"
        ),
        result_column: MAX_CURSOR_COL.to_string(),
    }
}

/// Build the query selecting the maximum of an ordered column.
///
/// Returns exactly one row; a NULL value in it means the table is empty.
/// `column` and `table` must already be identifier-quoted.
pub fn build_max_ordered_column_query(column: &str, table: &str) -> MaxValueQuery {
    MaxValueQuery {
        sql: format!("SELECT MAX({column}) AS {MAX_ORDERED_COL} FROM {table}"),
        result_column: MAX_ORDERED_COL.to_string(),
    }
}

// ============================================================================
// Size-Estimate Query
// ============================================================================

/// A size-estimate query plus the columns to read from its result rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeEstimateQuery {
    /// Finalized SQL text
    pub sql: String,
    /// Result column holding total size in bytes
    pub size_column: String,
    /// Result column holding average row length in bytes
    pub avg_row_column: String,
}

/// Build the metadata-catalog query estimating table size and average row
/// length.
///
/// `schema` and `table` are embedded as string literals, not identifiers.
/// The query may legitimately return zero rows for tables the engine has not
/// analyzed; callers must treat that as "unknown", not as an error.
pub fn build_size_estimate_query(dialect: Dialect, schema: &str, table: &str) -> SizeEstimateQuery {
    let sql = match dialect {
        Dialect::Mssql | Dialect::Mysql => format!(
            "SELECT (data_length + index_length) AS {TABLE_SIZE_BYTES_COL}, \
             avg_row_length AS {AVG_ROW_LENGTH_COL} \
             FROM information_schema.tables \
             WHERE table_schema = '{schema}' AND table_name = '{table}'"
        ),
        Dialect::Postgres => format!(
            "SELECT pg_total_relation_size(c.oid) AS {TABLE_SIZE_BYTES_COL}, \
             CASE WHEN c.reltuples > 0 \
             THEN (pg_table_size(c.oid) / c.reltuples)::bigint ELSE 0 END \
             AS {AVG_ROW_LENGTH_COL} \
             FROM pg_class c JOIN pg_namespace n ON n.oid = c.relnamespace \
             WHERE n.nspname = '{schema}' AND c.relname = '{table}'"
        ),
    };

    SizeEstimateQuery {
        sql,
        size_column: TABLE_SIZE_BYTES_COL.to_string(),
        avg_row_column: AVG_ROW_LENGTH_COL.to_string(),
    }
}

// ============================================================================
// Index-Lookup Query
// ============================================================================

/// An index-lookup query; rows carry `index_name`, `index_description` and
/// `index_keys` columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexLookupQuery {
    /// Finalized SQL text
    pub sql: String,
}

/// Build the query listing index name/description/key-column triples for a
/// table.
///
/// Diagnostic logging only; a failure running this query is non-fatal.
pub fn build_index_lookup_query(dialect: Dialect, schema: &str, table: &str) -> IndexLookupQuery {
    let sql = match dialect {
        Dialect::Mssql => {
            if schema.is_empty() {
                format!("EXEC sp_helpindex N'{table}'")
            } else {
                format!("EXEC sp_helpindex N'{schema}.{table}'")
            }
        }
        Dialect::Postgres => format!(
            "SELECT indexname AS {INDEX_NAME_COL}, \
             indexdef AS {INDEX_DESCRIPTION_COL}, \
             substring(indexdef from '\\((.*)\\)') AS {INDEX_KEYS_COL} \
             FROM pg_indexes \
             WHERE schemaname = '{schema}' AND tablename = '{table}'"
        ),
        Dialect::Mysql => format!(
            "SELECT index_name AS {INDEX_NAME_COL}, \
             index_type AS {INDEX_DESCRIPTION_COL}, \
             GROUP_CONCAT(column_name ORDER BY seq_in_index) AS {INDEX_KEYS_COL} \
             FROM information_schema.statistics \
             WHERE table_schema = '{schema}' AND table_name = '{table}' \
             GROUP BY index_name, index_type"
        ),
    };

    IndexLookupQuery { sql }
}
