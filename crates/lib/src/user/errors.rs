//! Structured error types for the user record store.

use thiserror::Error;

/// Errors produced by the record store itself.
///
/// These cover decoding a fetched row into a [`UserRecord`](super::UserRecord);
/// storage failures pass through as
/// [`StorageError`](crate::storage::StorageError) unchanged, and lookup
/// misses are `Ok(None)`, not errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum UserError {
    /// A fetched row is missing an expected column.
    #[error("Missing column '{column}' in fetched user row")]
    MissingColumn { column: &'static str },

    /// A fetched cell has the wrong type for its column.
    #[error("Column '{column}' in fetched user row has unexpected type (expected {expected})")]
    ColumnType {
        column: &'static str,
        expected: &'static str,
    },
}

impl UserError {
    /// Check if this error indicates a row that could not be decoded.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            UserError::MissingColumn { .. } | UserError::ColumnType { .. }
        )
    }

    /// The column involved.
    pub fn column(&self) -> &'static str {
        match self {
            UserError::MissingColumn { column } | UserError::ColumnType { column, .. } => column,
        }
    }
}

// Conversion from UserError to the main Error type
impl From<UserError> for crate::Error {
    fn from(err: UserError) -> Self {
        crate::Error::User(err)
    }
}
