//!
//! Userdb: a single-table data-access layer for user account records.
//!
//! This library provides the storage contract and the record store used by the
//! account subsystem of a web application.
//!
//! ## Core Concepts
//!
//! * **Values and Rows (`storage::Value`, `storage::Row`)**: The untyped cell and row
//!   representation exchanged with a storage engine.
//! * **Selects (`storage::Select`)**: A value-level description of an equality-filtered
//!   projection, including computed epoch columns for date normalization.
//! * **TabularStorage (`storage::TabularStorage`)**: A pluggable storage engine providing
//!   the select/insert/update/count primitives for one table.
//! * **InMemoryTable (`storage::InMemoryTable`)**: A reference engine backed by an
//!   in-process row map, used for tests and development.
//! * **UserStore (`user::UserStore`)**: The record store itself. Translates semantic
//!   lookups and mutations of user accounts into storage calls. It holds only an
//!   immutable storage handle and no other state.
//! * **Clocks (`clock::Clock`)**: Time source abstraction so engines can resolve
//!   server-side "now" markers, with a deterministic clock for tests.

pub mod clock;
pub mod storage;
pub mod user;

pub use clock::{Clock, SystemClock};
pub use storage::{Column, FieldMap, InMemoryTable, Row, Select, TabularStorage, Timestamp, Value};
pub use user::{NewUser, UserRecord, UserStore, users_table};

#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;

/// Result type used throughout the userdb library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the userdb library.
///
/// Lookup misses are not represented here: "find" operations return
/// `Ok(None)` when no record matches, and reserve errors for storage
/// failures and row-decoding problems.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured storage engine errors from the storage module
    #[error(transparent)]
    Storage(storage::StorageError),

    /// Structured record store errors from the user module
    #[error(transparent)]
    User(user::UserError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Storage(_) => "storage",
            Error::User(_) => "user",
        }
    }

    /// Check if this error originated in the storage engine.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Check if this error is a storage uniqueness-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Error::Storage(err) => err.is_unique_violation(),
            _ => false,
        }
    }

    /// Check if this error was caused by a column name unknown to the schema.
    pub fn is_unknown_column(&self) -> bool {
        match self {
            Error::Storage(err) => err.is_unknown_column(),
            _ => false,
        }
    }

    /// Check if this error indicates a fetched row that could not be decoded
    /// into a [`UserRecord`].
    pub fn is_decode_error(&self) -> bool {
        match self {
            Error::User(err) => err.is_decode_error(),
            _ => false,
        }
    }
}
