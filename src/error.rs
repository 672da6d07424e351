//! Error types for Relsync
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for Relsync
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors (fatal for the affected stream, no retry)
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Stream '{stream}' was not provided with an appropriate cursor")]
    MissingCursorField { stream: String },

    #[error("Stream '{stream}' has no ordered column configured")]
    MissingOrderedColumn { stream: String },

    // ============================================================================
    // Query Execution Errors (fatal for the affected stream, retry is the
    // executor's business)
    // ============================================================================
    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Query returned an unexpected shape: {message}")]
    UnexpectedResultShape { message: String },

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    #[error("Checkpoint failed: {message}")]
    Checkpoint { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing-cursor error for a stream
    pub fn missing_cursor(stream: impl Into<String>) -> Self {
        Self::MissingCursorField {
            stream: stream.into(),
        }
    }

    /// Create a missing-ordered-column error for a stream
    pub fn missing_ordered_column(stream: impl Into<String>) -> Self {
        Self::MissingOrderedColumn {
            stream: stream.into(),
        }
    }

    /// Create a query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Create an unexpected-result-shape error
    pub fn unexpected_shape(message: impl Into<String>) -> Self {
        Self::UnexpectedResultShape {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create a checkpoint error
    pub fn checkpoint(message: impl Into<String>) -> Self {
        Self::Checkpoint {
            message: message.into(),
        }
    }

    /// Check if this error is a stream configuration problem.
    ///
    /// Configuration errors cannot be recovered by retrying the query; the
    /// stream cannot be synced until its configuration is fixed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::MissingCursorField { .. }
                | Error::MissingOrderedColumn { .. }
        )
    }
}

/// Result type alias for Relsync
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
