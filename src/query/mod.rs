//! SQL text construction
//!
//! Pure query-text builders for the bound and metadata queries the progress
//! computer runs. Builders never execute anything and never validate
//! identifiers; malformed identifiers surface as syntax errors from the
//! database, unmodified.

mod builder;

pub use builder::{
    build_index_lookup_query, build_max_ordered_column_query, build_max_value_query,
    build_size_estimate_query, qualified_table_name, quote_identifier, IndexLookupQuery,
    MaxValueQuery, SizeEstimateQuery, AVG_ROW_LENGTH_COL, INDEX_DESCRIPTION_COL, INDEX_KEYS_COL,
    INDEX_NAME_COL, MAX_CURSOR_COL, MAX_ORDERED_COL, TABLE_SIZE_BYTES_COL,
};
