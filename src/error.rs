//! Custom error types for hisab
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for hisab operations
#[derive(Error, Debug)]
pub enum HisabError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage accessed before it has been loaded
    #[error("Storage not initialized: {0}")]
    NotInitialized(&'static str),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Drive sync errors (configuration and flow; remote failures are
    /// reported as `SyncOutcome` values instead)
    #[error("Sync error: {0}")]
    Sync(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl HisabError {
    /// Create a "not found" error for entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "duplicate" error for category heads
    pub fn duplicate_head(identifier: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: "Head",
            identifier: identifier.into(),
        }
    }
}

/// Convenience result type alias
pub type HisabResult<T> = Result<T, HisabError>;
