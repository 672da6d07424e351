//! Per-stream state tracking and checkpointing
//!
//! Owns the in-memory record of sync progress per stream and its
//! serialization into persisted checkpoints a resumed run reads back.
//!
//! # Overview
//!
//! The state module provides:
//! - `OrderedColumnLoadStatus` / `CursorBasedStatus` - per-stream progress records
//! - `StreamStateTracker` - the per-run map from stream to progress record
//! - `StreamCheckpoint` - the stream-scoped envelope sent to the checkpoint sink

mod tracker;
mod types;

pub use tracker::{InitialLoadStateTracker, StreamStateTracker};
pub use types::{
    CursorBasedStatus, LoadPhase, OrderedColumnInfo, OrderedColumnLoadStatus, StateType,
    StreamCheckpoint, STATE_VERSION,
};
