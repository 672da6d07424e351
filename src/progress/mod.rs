//! Sync bound and size-estimate computation
//!
//! Turns query-builder output plus externally executed result rows into the
//! typed bounds a sync needs: the maximum cursor or ordered-column value, the
//! count of rows tied at it, and table size estimates for the chunking
//! decision.

mod computer;

pub use computer::{CursorBound, LoadStrategy, ProgressComputer};

#[cfg(test)]
mod tests;
