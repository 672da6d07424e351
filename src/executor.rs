//! Collaborator traits
//!
//! The progress subsystem never talks to a database driver or a persistence
//! sink directly. It consumes three narrow interfaces, implemented by the
//! embedding sync engine (or by the reference DuckDB executor in
//! [`crate::database`]).

use crate::error::Result;
use crate::state::StreamCheckpoint;
use crate::types::{JsonValue, StreamKey};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

// ============================================================================
// Query Execution
// ============================================================================

/// Executes finalized SQL text against the source database.
///
/// Implementations return the full, materialized result set (not a live
/// cursor). Rows are JSON objects keyed by result-column name. Timeout and
/// cancellation policy belong to the implementation; errors propagate to the
/// caller unmodified and are fatal for the stream being computed.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute the query and return all result rows
    async fn query(&self, sql: &str) -> Result<Vec<JsonValue>>;
}

#[async_trait]
impl<T: QueryExecutor + ?Sized> QueryExecutor for Arc<T> {
    async fn query(&self, sql: &str) -> Result<Vec<JsonValue>> {
        (**self).query(sql).await
    }
}

// ============================================================================
// Cursor Resolution
// ============================================================================

/// Resolves the configured cursor field for a stream.
///
/// Returns `None` when no cursor was ever configured for the stream; the
/// progress computer turns that into a fatal configuration error for
/// cursor-based operations.
pub trait CursorResolver: Send + Sync {
    /// The cursor field previously configured/persisted for the stream
    fn cursor_field(&self, stream: &StreamKey) -> Option<String>;
}

/// Cursor resolver backed by a fixed map, for embedders whose catalog is
/// already materialized (and for tests)
#[derive(Debug, Default, Clone)]
pub struct FixedCursorResolver {
    fields: HashMap<StreamKey, String>,
}

impl FixedCursorResolver {
    /// Create a resolver from a stream-to-cursor-field map
    pub fn new(fields: HashMap<StreamKey, String>) -> Self {
        Self { fields }
    }

    /// Register a cursor field for a stream
    pub fn with_field(mut self, stream: StreamKey, field: impl Into<String>) -> Self {
        self.fields.insert(stream, field.into());
        self
    }
}

impl CursorResolver for FixedCursorResolver {
    fn cursor_field(&self, stream: &StreamKey) -> Option<String> {
        self.fields.get(stream).cloned()
    }
}

// ============================================================================
// Checkpoint Sink
// ============================================================================

/// Accepts serialized per-stream checkpoint messages.
///
/// Delivery and acknowledgement semantics are owned by the implementation.
#[async_trait]
pub trait CheckpointSink: Send + Sync {
    /// Submit one per-stream checkpoint
    async fn submit(&self, checkpoint: StreamCheckpoint) -> Result<()>;
}

/// In-memory checkpoint sink collecting everything submitted to it.
///
/// Clones share the same underlying buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryCheckpointSink {
    checkpoints: Arc<Mutex<Vec<StreamCheckpoint>>>,
}

impl MemoryCheckpointSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All checkpoints submitted so far, in submission order
    pub async fn checkpoints(&self) -> Vec<StreamCheckpoint> {
        self.checkpoints.lock().await.clone()
    }
}

#[async_trait]
impl CheckpointSink for MemoryCheckpointSink {
    async fn submit(&self, checkpoint: StreamCheckpoint) -> Result<()> {
        self.checkpoints.lock().await.push(checkpoint);
        Ok(())
    }
}
