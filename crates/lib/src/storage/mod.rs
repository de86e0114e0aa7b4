//! Tabular storage boundary for the record store
//!
//! This module defines the contract between the record store and whatever
//! engine persists its table: the [`TabularStorage`] trait and the value-level
//! types exchanged across it ([`Value`], [`Row`], [`Select`], [`FieldMap`]).
//! The core store logic is independent of the specific storage mechanism;
//! engines decide how to execute the described queries.
//!
//! Uniqueness constraints live on the engine side of this boundary. The
//! record store never re-validates them; it only surfaces the engine's
//! [`StorageError::UniqueViolation`](errors::StorageError::UniqueViolation)
//! unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod errors;
pub mod in_memory;

pub use errors::StorageError;
pub use in_memory::InMemoryTable;

/// A single cell value exchanged with a storage engine.
///
/// `Now` is the server-time expression: a marker asking the engine to
/// evaluate the current server time at write execution, rather than a
/// literal timestamp computed on the application host. It is only legal in
/// write field maps; fetched rows never contain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Absent / SQL NULL.
    Null,
    /// Integer cell, also used for epoch timestamps.
    Int(i64),
    /// Text cell.
    Text(String),
    /// Server-side "current time" expression, resolved by the engine at
    /// write time.
    Now,
}

impl Value {
    /// Build a text value from anything string-like.
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// The contained integer, if this is an `Int` cell.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The contained text, if this is a `Text` cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// A write-path timestamp: either a literal epoch value supplied by the
/// caller, or a request to let the storage engine supply the current time.
///
/// Delegating to the engine avoids clock disagreement between the
/// application host and the storage host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Epoch seconds supplied by the caller.
    Explicit(i64),
    /// Resolve to the storage engine's current time at write execution.
    ServerNow,
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        match value {
            Timestamp::Explicit(secs) => Value::Int(secs),
            Timestamp::ServerNow => Value::Now,
        }
    }
}

/// Ordered column-to-value map used for inserts and updates.
pub type FieldMap = BTreeMap<String, Value>;

/// One projected column of a [`Select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Every stored column (`*`).
    All,
    /// A stored column by name.
    Name(String),
    /// A computed column converting a stored date column into integer epoch
    /// seconds, returned under `alias` (e.g. `UNIX_TIMESTAMP(joindate) AS
    /// ts_joindate` in a SQL engine).
    Epoch { source: String, alias: String },
}

impl Column {
    /// A stored column by name.
    pub fn name(name: impl Into<String>) -> Self {
        Column::Name(name.into())
    }

    /// An epoch conversion of `source`, projected as `alias`.
    pub fn epoch(source: impl Into<String>, alias: impl Into<String>) -> Self {
        Column::Epoch {
            source: source.into(),
            alias: alias.into(),
        }
    }
}

/// A value-level description of an equality-filtered projection.
///
/// Built fluently and handed to [`TabularStorage::fetch_first`]; the engine
/// decides how to execute it. Filters chain with AND semantics.
///
/// # Example
///
/// ```
/// use userdb::{Column, Select};
///
/// let select = Select::columns([Column::All, Column::epoch("joindate", "ts_joindate")])
///     .filter("username", "alice");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    columns: Vec<Column>,
    filters: Vec<(String, Value)>,
}

impl Select {
    /// Start a select with the given projection.
    pub fn columns(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            filters: Vec::new(),
        }
    }

    /// Add an equality filter on `column`.
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// The projected columns.
    pub fn projection(&self) -> &[Column] {
        &self.columns
    }

    /// The equality filters, in the order they were added.
    pub fn filters(&self) -> &[(String, Value)] {
        &self.filters
    }
}

/// A fetched row: projected column (or alias) names mapped to cell values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    /// An empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing any previous value for that column.
    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.0.insert(column.into(), value);
    }

    /// The raw cell value for `column`, if projected.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// The text cell for `column`. `None` for absent, `Null`, or non-text
    /// cells.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_text)
    }

    /// The integer cell for `column`. `None` for absent, `Null`, or
    /// non-integer cells.
    pub fn int(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_int)
    }

    /// Iterate over projected (column, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of projected cells.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was projected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Storage engine contract for a single table.
///
/// Implementations handle the specifics of how the table is persisted (in
/// memory, in a SQL database, ...). The record store drives this trait and
/// nothing else; it holds no engine-specific knowledge.
///
/// All engines must be `Send + Sync` so a store handle can be shared across
/// request-handling threads. Operations are synchronous and complete before
/// returning; engines must not require any call ordering between them.
pub trait TabularStorage: Send + Sync {
    /// Execute `select` and return the first matching row, or `None` when
    /// nothing matches. A miss is a normal outcome, not an error.
    fn fetch_first(&self, select: &Select) -> Result<Option<Row>, StorageError>;

    /// Insert one row and return its generated identity value.
    ///
    /// `Value::Now` cells are resolved to server time at execution.
    fn insert(&self, fields: &FieldMap) -> Result<i64, StorageError>;

    /// Apply `fields` to every row whose `column` equals `value`, returning
    /// the affected row count.
    fn update(&self, fields: &FieldMap, column: &str, value: &Value) -> Result<u64, StorageError>;

    /// Count rows whose `column` equals `value`.
    fn count(&self, column: &str, value: &Value) -> Result<u64, StorageError>;
}
