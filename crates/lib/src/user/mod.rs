//! User record store
//!
//! [`UserStore`] is the single point of access for reading and writing user
//! account records. It translates semantic lookups (by username, id, or
//! email) and mutations (create, password/lastlogin setters, field updates)
//! into [`TabularStorage`] calls, and normalizes stored date columns into
//! epoch seconds on the way out.
//!
//! The store is a stateless facade: it holds its storage handle and nothing
//! else, so a single instance can serve any number of sequential requests.
//! Uniqueness of `username` and `userid` is enforced by the storage layer,
//! not re-validated here.

use tracing::debug;

use crate::Result;
use crate::storage::{Column, FieldMap, Select, TabularStorage, Timestamp, Value};

pub mod errors;
pub mod record;

pub use errors::UserError;
pub use record::{NewUser, UserRecord};

use crate::storage::InMemoryTable;

/// Record store for the `users` table.
///
/// Constructed over any [`TabularStorage`] engine; the engine handle is the
/// store's only state. "Find" operations return `Ok(None)` on a miss, which
/// is an expected outcome and never an error. Storage failures propagate
/// unchanged.
///
/// # Example
///
/// ```
/// use userdb::user::{NewUser, UserStore};
///
/// # fn main() -> userdb::Result<()> {
/// let store = UserStore::new(userdb::user::users_table());
/// let id = store.create_user(&NewUser::new("alice1", "hashed123", "a@example.com", "X"))?;
/// let record = store.find_by_id(id)?.expect("just created");
/// assert_eq!(record.username, "alice1");
/// # Ok(())
/// # }
/// ```
pub struct UserStore<S> {
    storage: S,
}

impl<S: TabularStorage> UserStore<S> {
    /// Create a store over the given storage engine.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Access the underlying storage engine.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Look up one user by unique name.
    pub fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        self.find_by("username", Value::text(username))
    }

    /// Look up one user by unique id.
    pub fn find_by_id(&self, user_id: i64) -> Result<Option<UserRecord>> {
        self.find_by("userid", Value::Int(user_id))
    }

    /// Look up one user by email address.
    ///
    /// Email is not unique at this layer; when duplicates exist the first
    /// matching record is returned.
    pub fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.find_by("email", Value::text(email))
    }

    /// Get the identity value for a username without fetching the full
    /// record.
    pub fn user_id(&self, username: &str) -> Result<Option<i64>> {
        let select = Select::columns([Column::name("userid")]).filter("username", username);
        match self.storage.fetch_first(&select)? {
            Some(row) => match row.get("userid") {
                Some(value) => match value.as_int() {
                    Some(id) => Ok(Some(id)),
                    None => Err(UserError::ColumnType {
                        column: "userid",
                        expected: "integer",
                    }
                    .into()),
                },
                None => Err(UserError::MissingColumn { column: "userid" }.into()),
            },
            None => Ok(None),
        }
    }

    /// Check whether a username is already registered.
    pub fn username_exists(&self, username: &str) -> Result<bool> {
        let count = self.storage.count("username", &Value::text(username))?;
        Ok(count > 0)
    }

    /// Set a user's last login time, returning the affected row count.
    ///
    /// [`Timestamp::ServerNow`] delegates to the storage engine's current
    /// time rather than reading a clock here, so the recorded value cannot
    /// drift from the storage host.
    pub fn set_last_login(&self, user_id: i64, when: Timestamp) -> Result<u64> {
        debug!(user_id, ?when, "setting last login");
        self.update_user(
            user_id,
            FieldMap::from([("lastlogin".to_string(), Value::from(when))]),
        )
    }

    /// Replace a user's password value, returning the affected row count.
    ///
    /// The caller guarantees `mangled_password` is already hashed; it is
    /// stored verbatim.
    pub fn set_password(&self, user_id: i64, mangled_password: &str) -> Result<u64> {
        debug!(user_id, "setting password");
        self.update_user(
            user_id,
            FieldMap::from([("password".to_string(), Value::text(mangled_password))]),
        )
    }

    /// Create a user record and return its generated id.
    ///
    /// The join date is always written as server time, regardless of
    /// caller input. The credential tier is written only when the caller
    /// supplies one; otherwise the storage schema default applies.
    pub fn create_user(&self, user: &NewUser) -> Result<i64> {
        let mut fields = FieldMap::from([
            ("username".to_string(), Value::text(user.username.as_str())),
            ("password".to_string(), Value::text(user.password.as_str())),
            ("email".to_string(), Value::text(user.email.as_str())),
            ("location".to_string(), Value::text(user.location.as_str())),
            ("joindate".to_string(), Value::Now),
        ]);
        // may be explicitly set by maintenance tools
        if let Some(level) = user.user_level {
            fields.insert("userlevel".to_string(), Value::Int(level));
        }

        debug!(username = %user.username, "creating user");
        let id = self.storage.insert(&fields)?;
        Ok(id)
    }

    /// Apply a field map to one user record, returning the affected row
    /// count.
    ///
    /// Keys must name existing table columns and values must already be
    /// trimmed and validated; this is a direct passthrough to the storage
    /// update with no validation or coercion. Unknown columns are rejected
    /// by the storage engine, not here.
    pub fn update_user(&self, user_id: i64, fields: FieldMap) -> Result<u64> {
        let affected = self
            .storage
            .update(&fields, "userid", &Value::Int(user_id))?;
        Ok(affected)
    }

    /// Shared lookup: equality-select all columns plus the computed epoch
    /// columns, decode the first row.
    fn find_by(&self, column: &str, value: Value) -> Result<Option<UserRecord>> {
        let select = Select::columns([
            Column::All,
            Column::epoch("joindate", "ts_joindate"),
            Column::epoch("lastlogin", "ts_lastlogin"),
        ])
        .filter(column, value);

        match self.storage.fetch_first(&select)? {
            Some(row) => Ok(Some(UserRecord::from_row(&row)?)),
            None => Ok(None),
        }
    }
}

/// An [`InMemoryTable`] matching the production `users` schema, for tests
/// and development.
///
/// Username carries the uniqueness constraint, `userlevel` defaults to the
/// member tier, and `timezone` defaults to an empty string, mirroring the
/// production schema defaults.
pub fn users_table() -> InMemoryTable {
    let mut table = InMemoryTable::new(record::TABLE, "userid");
    for column in record::COLUMNS {
        if column != "userid" {
            table = table.column(column);
        }
    }
    table
        .unique("username")
        .column_default("userlevel", Value::Int(record::USERLEVEL_USER))
        .column_default("timezone", Value::text(""))
}
