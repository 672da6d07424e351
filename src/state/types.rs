//! State types for tracking sync progress
//!
//! These types are serialized into per-stream checkpoints and persisted
//! between runs.

use crate::types::{JsonValue, StreamKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted state schema version
pub const STATE_VERSION: u32 = 2;

// ============================================================================
// State Type Discriminator
// ============================================================================

/// Discriminator tag identifying the shape of a persisted stream state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateType {
    /// Ordered-column initial load in progress
    OrderedColumn,
    /// Cursor-based incremental sync
    CursorBased,
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderedColumn => write!(f, "ordered_column"),
            Self::CursorBased => write!(f, "cursor_based"),
        }
    }
}

// ============================================================================
// Ordered-Column Info
// ============================================================================

/// The column a stream's initial load pages by, with its declared data type.
///
/// Set once at sync start; read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedColumnInfo {
    /// Column name used for ordered paging
    pub column: String,
    /// Declared data type of the column
    pub data_type: String,
}

impl OrderedColumnInfo {
    /// Create a new ordered-column info
    pub fn new(column: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            data_type: data_type.into(),
        }
    }
}

// ============================================================================
// Ordered-Column Load Status
// ============================================================================

/// Progress record for an in-progress ordered-column initial load.
///
/// The last-read value is carried as text regardless of the underlying column
/// type; ordering for resume purposes is performed by the database via the
/// max-value query, never recomputed client-side. Successive updates for the
/// same stream must carry non-decreasing values (caller invariant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedColumnLoadStatus {
    /// Always [`StateType::OrderedColumn`]
    pub state_type: StateType,
    /// Always [`STATE_VERSION`]
    pub version: u32,
    /// Stream name
    pub stream_name: String,
    /// Stream namespace
    pub stream_namespace: String,
    /// Ordered column; exactly one field is supported
    pub ordered_col_field: Vec<String>,
    /// Last-read ordered-column value, as text
    pub ordered_col_val: String,
    /// Count of records read at that value
    pub ordered_col_record_count: u64,
}

impl OrderedColumnLoadStatus {
    /// Create a status for the given stream and ordered column
    pub fn new(
        stream: &StreamKey,
        field: impl Into<String>,
        value: impl Into<String>,
        record_count: u64,
    ) -> Self {
        Self {
            state_type: StateType::OrderedColumn,
            version: STATE_VERSION,
            stream_name: stream.name.clone(),
            stream_namespace: stream.namespace.clone(),
            ordered_col_field: vec![field.into()],
            ordered_col_val: value.into(),
            ordered_col_record_count: record_count,
        }
    }

    /// The single ordered-column field name
    pub fn field(&self) -> Option<&str> {
        self.ordered_col_field.first().map(String::as_str)
    }
}

// ============================================================================
// Cursor-Based Status
// ============================================================================

/// Progress record for cursor-based incremental sync.
///
/// `cursor_record_count` counts the rows sharing the maximum cursor value:
/// ties at the watermark are not otherwise distinguishable and must all be
/// considered already synced. `cursor` is absent when the table was empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorBasedStatus {
    /// Always [`StateType::CursorBased`]
    pub state_type: StateType,
    /// Always [`STATE_VERSION`]
    pub version: u32,
    /// Stream name
    pub stream_name: String,
    /// Stream namespace
    pub stream_namespace: String,
    /// Cursor field; exactly one field is supported
    pub cursor_field: Vec<String>,
    /// Current cursor value, as text; absent for an empty table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Count of records sharing the maximum cursor value
    #[serde(default)]
    pub cursor_record_count: u64,
}

impl CursorBasedStatus {
    /// Create a status for the given stream and cursor field, with no
    /// watermark yet
    pub fn new(stream: &StreamKey, cursor_field: impl Into<String>) -> Self {
        Self {
            state_type: StateType::CursorBased,
            version: STATE_VERSION,
            stream_name: stream.name.clone(),
            stream_namespace: stream.namespace.clone(),
            cursor_field: vec![cursor_field.into()],
            cursor: None,
            cursor_record_count: 0,
        }
    }

    /// Set the watermark value and tie count
    pub fn with_bound(mut self, cursor: impl Into<String>, record_count: u64) -> Self {
        self.cursor = Some(cursor.into());
        self.cursor_record_count = record_count;
        self
    }

    /// The single cursor field name
    pub fn field(&self) -> Option<&str> {
        self.cursor_field.first().map(String::as_str)
    }
}

// ============================================================================
// Checkpoint Envelope
// ============================================================================

/// Stream-scoped checkpoint envelope: the stream identity plus an opaque
/// state payload.
///
/// A checkpoint is always scoped to exactly one stream; state for other
/// streams is never embedded, so a crash mid-stream cannot corrupt another
/// stream's resumability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamCheckpoint {
    /// The stream this checkpoint belongs to
    pub stream: StreamKey,
    /// Opaque state payload
    pub state: JsonValue,
    /// When the checkpoint was created
    pub emitted_at: DateTime<Utc>,
}

impl StreamCheckpoint {
    /// Create a checkpoint for a stream with the given payload
    pub fn new(stream: StreamKey, state: JsonValue) -> Self {
        Self {
            stream,
            state,
            emitted_at: Utc::now(),
        }
    }
}

// ============================================================================
// Load Phase
// ============================================================================

/// Per-stream initial-load state machine.
///
/// `NotStarted` until the first chunk is read, `InProgress` while a load
/// status exists, `Completed` once the final checkpoint hands the stream off
/// to its incremental strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// No load status exists for the stream yet
    NotStarted,
    /// A load status exists; chunks are being read
    InProgress,
    /// Initial load finished; subsequent runs use the incremental strategy
    Completed,
}

impl LoadPhase {
    /// Returns `true` once the initial load is finished for the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}
