//! In-memory storage engine
//!
//! A simple [`TabularStorage`] implementation backed by an in-process row
//! map. Suitable for testing, development, or scenarios where persistence is
//! not strictly required or is handled externally (e.g., by saving/loading
//! the whole table state to/from a file).
//!
//! This engine is where the storage-side responsibilities of the contract
//! live: identity generation, unique-column enforcement, schema (column
//! name) checking, and resolution of [`Value::Now`] markers against a
//! [`Clock`]. Timestamps are stored natively as epoch seconds, so the
//! `Epoch` projection reduces to an alias of the stored integer.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::{Column, FieldMap, Row, Select, StorageError, TabularStorage, Value};
use crate::clock::{Clock, SystemClock};

type StoredRow = BTreeMap<String, Value>;

/// Serializable table contents for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableState {
    rows: BTreeMap<i64, StoredRow>,
    next_id: i64,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory single-table storage engine.
///
/// Built fluently from a column list with optional per-column defaults and
/// unique constraints. The identity column is declared at construction,
/// generated by the engine on insert, and rejected in write field maps (the
/// identity of a row never changes once assigned).
///
/// Rows are guarded by a read-write lock so a shared handle is safe across
/// threads, but the engine performs no caching and holds no other state.
///
/// # Example
///
/// ```
/// use userdb::storage::{FieldMap, InMemoryTable, TabularStorage, Value};
///
/// let table = InMemoryTable::new("users", "userid")
///     .unique("username")
///     .column("password")
///     .column_default("userlevel", Value::Int(1));
///
/// let fields = FieldMap::from([
///     ("username".to_string(), Value::text("alice")),
///     ("password".to_string(), Value::text("secret-hash")),
/// ]);
/// let id = table.insert(&fields).unwrap();
/// assert_eq!(id, 1);
/// ```
#[derive(Debug)]
pub struct InMemoryTable {
    table: String,
    identity: String,
    columns: Vec<String>,
    defaults: BTreeMap<String, Value>,
    unique: Vec<String>,
    clock: Box<dyn Clock>,
    state: RwLock<TableState>,
}

impl InMemoryTable {
    /// Create an empty table named `table` with the given identity column.
    ///
    /// The identity column is part of the schema and can be filtered and
    /// projected, but its values are always generated by the engine.
    pub fn new(table: impl Into<String>, identity: impl Into<String>) -> Self {
        let identity = identity.into();
        Self {
            table: table.into(),
            columns: vec![identity.clone()],
            identity,
            defaults: BTreeMap::new(),
            unique: Vec::new(),
            clock: Box::new(SystemClock),
            state: RwLock::new(TableState::default()),
        }
    }

    /// Add a column to the schema. Unset cells default to `Null`.
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.add_column(name.into());
        self
    }

    /// Add a column whose unset cells default to `value` instead of `Null`.
    pub fn column_default(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        self.add_column(name.clone());
        self.defaults.insert(name, value);
        self
    }

    /// Add a column carrying a uniqueness constraint.
    ///
    /// Writes that would duplicate a non-null value in this column fail with
    /// [`StorageError::UniqueViolation`].
    pub fn unique(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.add_column(name.clone());
        self.unique.push(name);
        self
    }

    /// Replace the engine clock used to resolve [`Value::Now`].
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The table name this engine was built with.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.state.read().unwrap().rows.len()
    }

    /// True when no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Persist the table contents to `path` as JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let state = self.state.read().unwrap();
        let json = serde_json::to_string_pretty(&*state)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Replace the table contents with previously saved state from `path`.
    ///
    /// The schema is not persisted; load into a table built with the same
    /// columns it was saved from.
    pub fn load_from_file(self, path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let json = fs::read_to_string(path)?;
        let loaded: TableState = serde_json::from_str(&json)?;
        *self.state.write().unwrap() = loaded;
        Ok(self)
    }

    fn add_column(&mut self, name: String) {
        if !self.columns.contains(&name) {
            self.columns.push(name);
        }
    }

    fn check_column(&self, column: &str) -> Result<(), StorageError> {
        if self.columns.iter().any(|c| c == column) {
            Ok(())
        } else {
            Err(StorageError::UnknownColumn {
                table: self.table.clone(),
                column: column.to_string(),
            })
        }
    }

    fn check_writable(&self, fields: &FieldMap) -> Result<(), StorageError> {
        for column in fields.keys() {
            self.check_column(column)?;
        }
        if fields.contains_key(&self.identity) {
            return Err(StorageError::Backend {
                reason: format!(
                    "identity column '{}' is generated by the engine and cannot be written",
                    self.identity
                ),
            });
        }
        Ok(())
    }

    fn resolve(&self, value: &Value) -> Value {
        match value {
            Value::Now => Value::Int(self.clock.now_secs()),
            other => other.clone(),
        }
    }

    fn matches(row: &StoredRow, filters: &[(String, Value)]) -> bool {
        filters
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }

    fn unique_violation(&self, column: &str) -> StorageError {
        StorageError::UniqueViolation {
            table: self.table.clone(),
            column: column.to_string(),
        }
    }
}

impl TabularStorage for InMemoryTable {
    fn fetch_first(&self, select: &Select) -> Result<Option<Row>, StorageError> {
        for (column, _) in select.filters() {
            self.check_column(column)?;
        }
        for column in select.projection() {
            match column {
                Column::All => {}
                Column::Name(name) => self.check_column(name)?,
                Column::Epoch { source, .. } => self.check_column(source)?,
            }
        }

        let state = self.state.read().unwrap();
        let Some(stored) = state
            .rows
            .values()
            .find(|row| Self::matches(row, select.filters()))
        else {
            return Ok(None);
        };

        let mut row = Row::new();
        for column in select.projection() {
            match column {
                Column::All => {
                    for (name, value) in stored {
                        row.set(name.clone(), value.clone());
                    }
                }
                Column::Name(name) => {
                    row.set(name.clone(), stored.get(name).cloned().unwrap_or(Value::Null));
                }
                Column::Epoch { source, alias } => {
                    // Timestamps are stored as epoch seconds natively, so the
                    // conversion is an alias of the stored cell.
                    row.set(alias.clone(), stored.get(source).cloned().unwrap_or(Value::Null));
                }
            }
        }
        Ok(Some(row))
    }

    fn insert(&self, fields: &FieldMap) -> Result<i64, StorageError> {
        self.check_writable(fields)?;

        let mut state = self.state.write().unwrap();
        let mut row = StoredRow::new();
        for column in &self.columns {
            if column == &self.identity {
                continue;
            }
            let value = match fields.get(column) {
                Some(value) => self.resolve(value),
                None => self.defaults.get(column).cloned().unwrap_or(Value::Null),
            };
            row.insert(column.clone(), value);
        }

        for column in &self.unique {
            let Some(value) = row.get(column) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            if state
                .rows
                .values()
                .any(|existing| existing.get(column) == Some(value))
            {
                return Err(self.unique_violation(column));
            }
        }

        let id = state.next_id;
        state.next_id += 1;
        row.insert(self.identity.clone(), Value::Int(id));
        state.rows.insert(id, row);
        Ok(id)
    }

    fn update(&self, fields: &FieldMap, column: &str, value: &Value) -> Result<u64, StorageError> {
        self.check_writable(fields)?;
        self.check_column(column)?;

        let mut state = self.state.write().unwrap();
        let matching: Vec<i64> = state
            .rows
            .iter()
            .filter(|(_, row)| row.get(column) == Some(value))
            .map(|(id, _)| *id)
            .collect();

        // A zero-row update writes nothing, so it can duplicate nothing
        if matching.is_empty() {
            return Ok(0);
        }

        for unique_column in &self.unique {
            let Some(new_value) = fields.get(unique_column) else {
                continue;
            };
            let new_value = self.resolve(new_value);
            if new_value.is_null() {
                continue;
            }
            // Writing one value into a unique column of several rows can
            // never succeed.
            if matching.len() > 1 {
                return Err(self.unique_violation(unique_column));
            }
            if state
                .rows
                .iter()
                .any(|(id, row)| !matching.contains(id) && row.get(unique_column) == Some(&new_value))
            {
                return Err(self.unique_violation(unique_column));
            }
        }

        for id in &matching {
            if let Some(row) = state.rows.get_mut(id) {
                for (name, new_value) in fields {
                    row.insert(name.clone(), self.resolve(new_value));
                }
            }
        }
        Ok(matching.len() as u64)
    }

    fn count(&self, column: &str, value: &Value) -> Result<u64, StorageError> {
        self.check_column(column)?;
        let state = self.state.read().unwrap();
        let count = state
            .rows
            .values()
            .filter(|row| row.get(column) == Some(value))
            .count();
        Ok(count as u64)
    }
}
