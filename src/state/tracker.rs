//! Per-stream initial-load state tracking
//!
//! The tracker owns the mapping from stream to progress record for the
//! lifetime of one sync invocation and serializes records into per-stream
//! checkpoint envelopes.

use super::types::{
    LoadPhase, OrderedColumnInfo, OrderedColumnLoadStatus, StreamCheckpoint,
};
use crate::error::{Error, Result};
use crate::types::{JsonValue, StreamKey};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

// ============================================================================
// Capability Trait
// ============================================================================

/// Capability set of an initial-load state tracker.
///
/// One concrete implementation exists ([`StreamStateTracker`]); the trait is
/// the seam unit tests substitute a fake through.
pub trait InitialLoadStateTracker: Send + Sync {
    /// Replace the stored load status for a stream
    fn update_ordered_column_load_state(&self, stream: &StreamKey, status: OrderedColumnLoadStatus);

    /// The stored load status for a stream, if its initial load has started
    fn get_ordered_column_load_status(&self, stream: &StreamKey)
        -> Option<OrderedColumnLoadStatus>;

    /// The ordered-column info for a stream, if one was configured
    fn get_ordered_column_info(&self, stream: &StreamKey) -> Option<OrderedColumnInfo>;

    /// Serialize the given status into an intermediate, mid-load checkpoint
    fn create_intermediate_checkpoint(
        &self,
        stream: &StreamKey,
        status: &OrderedColumnLoadStatus,
    ) -> Result<StreamCheckpoint>;

    /// Produce the terminal checkpoint for a stream whose initial load
    /// completed, embedding the incremental strategy's state payload
    fn create_final_checkpoint(
        &self,
        stream: &StreamKey,
        incremental_state: JsonValue,
    ) -> StreamCheckpoint;
}

// ============================================================================
// Stream State Tracker
// ============================================================================

#[derive(Debug, Default)]
struct Inner {
    load_statuses: HashMap<StreamKey, OrderedColumnLoadStatus>,
    column_info: HashMap<StreamKey, OrderedColumnInfo>,
    completed: HashSet<StreamKey>,
}

/// Per-run tracker of ordered-column initial-load progress.
///
/// Constructed at sync start (seeded from prior checkpoints or empty) and
/// discarded when the invocation ends. Clones share the same underlying map,
/// so concurrent per-stream worker tasks can insert and look up distinct keys;
/// mutation of any single stream's record must stay confined to the one task
/// scanning that stream.
#[derive(Debug, Clone, Default)]
pub struct StreamStateTracker {
    inner: Arc<RwLock<Inner>>,
}

impl StreamStateTracker {
    /// Create a tracker seeded with prior load statuses and the read-only
    /// ordered-column info per stream
    pub fn new(
        load_statuses: HashMap<StreamKey, OrderedColumnLoadStatus>,
        column_info: HashMap<StreamKey, OrderedColumnInfo>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                load_statuses,
                column_info,
                completed: HashSet::new(),
            })),
        }
    }

    /// Create a tracker with no prior state
    pub fn empty() -> Self {
        Self::default()
    }

    /// The initial-load phase for a stream
    pub fn load_phase(&self, stream: &StreamKey) -> LoadPhase {
        let inner = self.read();
        if inner.completed.contains(stream) {
            LoadPhase::Completed
        } else if inner.load_statuses.contains_key(stream) {
            LoadPhase::InProgress
        } else {
            LoadPhase::NotStarted
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl InitialLoadStateTracker for StreamStateTracker {
    /// Replace the stored load status for a stream.
    ///
    /// The replacement is unconditional: the tracker does not re-validate that
    /// the new value is not below the stored one, so a caller performing a
    /// deliberate rewind (e.g. after a schema change) is not blocked. Keeping
    /// values monotonically non-decreasing is the caller's invariant.
    fn update_ordered_column_load_state(
        &self,
        stream: &StreamKey,
        status: OrderedColumnLoadStatus,
    ) {
        let mut inner = self.write();
        if let Some(previous) = inner.load_statuses.get(stream) {
            if previous.ordered_col_val != status.ordered_col_val {
                tracing::debug!(
                    "Replacing load status for {stream}: {} -> {}",
                    previous.ordered_col_val,
                    status.ordered_col_val
                );
            }
        }
        inner.load_statuses.insert(stream.clone(), status);
    }

    fn get_ordered_column_load_status(
        &self,
        stream: &StreamKey,
    ) -> Option<OrderedColumnLoadStatus> {
        self.read().load_statuses.get(stream).cloned()
    }

    fn get_ordered_column_info(&self, stream: &StreamKey) -> Option<OrderedColumnInfo> {
        self.read().column_info.get(stream).cloned()
    }

    /// Serialize the given status into an intermediate checkpoint.
    ///
    /// The checkpoint is scoped to the one stream; state for other streams is
    /// never embedded.
    fn create_intermediate_checkpoint(
        &self,
        stream: &StreamKey,
        status: &OrderedColumnLoadStatus,
    ) -> Result<StreamCheckpoint> {
        let payload = serde_json::to_value(status).map_err(|e| Error::Checkpoint {
            message: format!("Failed to serialize load status for {stream}: {e}"),
        })?;
        tracing::debug!("State data for {stream}: {payload}");
        Ok(StreamCheckpoint::new(stream.clone(), payload))
    }

    /// Produce the terminal checkpoint for a stream.
    ///
    /// The payload is whatever the subsequent incremental strategy requires;
    /// it is opaque to the tracker. The stream's phase becomes
    /// [`LoadPhase::Completed`].
    fn create_final_checkpoint(
        &self,
        stream: &StreamKey,
        incremental_state: JsonValue,
    ) -> StreamCheckpoint {
        self.write().completed.insert(stream.clone());
        tracing::debug!("Final state data for {stream}: {incremental_state}");
        StreamCheckpoint::new(stream.clone(), incremental_state)
    }
}
