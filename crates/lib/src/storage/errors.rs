//! Structured error types for storage engines.
//!
//! Any failure produced behind the [`TabularStorage`](super::TabularStorage)
//! boundary is expressed as a [`StorageError`]. The record store propagates
//! these unchanged; there is no retry or recovery at this layer.

use thiserror::Error;

/// Errors produced by a storage engine.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StorageError {
    /// A column name that does not exist in the table schema was used in a
    /// query or field map.
    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// A write would duplicate a value in a unique column.
    #[error("Unique constraint violated on '{table}.{column}'")]
    UniqueViolation { table: String, column: String },

    /// Engine-specific failure (connectivity, malformed statement, ...).
    #[error("Storage backend failure: {reason}")]
    Backend { reason: String },

    /// I/O failure while persisting or loading engine state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure while persisting or loading engine state.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    /// Check if this error is a uniqueness-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StorageError::UniqueViolation { .. })
    }

    /// Check if this error was caused by an unknown column name.
    pub fn is_unknown_column(&self) -> bool {
        matches!(self, StorageError::UnknownColumn { .. })
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, StorageError::Io(_))
    }

    /// The column involved, for column-related errors.
    pub fn column(&self) -> Option<&str> {
        match self {
            StorageError::UnknownColumn { column, .. }
            | StorageError::UniqueViolation { column, .. } => Some(column),
            _ => None,
        }
    }
}

// Conversion from StorageError to the main Error type
impl From<StorageError> for crate::Error {
    fn from(err: StorageError) -> Self {
        crate::Error::Storage(err)
    }
}
