//! Error types for kvhandle
//!
//! Every failure reported by the engine is carried verbatim as the
//! `source()` of one of these variants. Nothing is retried or recovered here.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for kvhandle operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Failed to open database at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: sled::Error,
    },

    #[error("Failed to close database: {0}")]
    Close(#[source] sled::Error),

    #[error("Database is closed")]
    Closed,

    #[error("Cannot close database with {0} open cursor(s)")]
    CursorsOpen(usize),

    // -------------------------------------------------------------------------
    // Data Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    NotFound,

    #[error("Engine I/O error: {0}")]
    Io(#[from] sled::Error),

    #[error("Iteration failed: {0}")]
    Iteration(#[source] sled::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// True when a read found no value for the key
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvError::NotFound)
    }

    /// True when the handle was used after close
    pub fn is_closed(&self) -> bool {
        matches!(self, KvError::Closed)
    }
}
