//! The user account record and its table schema constants

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::errors::UserError;
use crate::storage::Row;

/// Name of the backing table.
pub const TABLE: &str = "users";

/// The full column set of the backing table, in schema order.
pub const COLUMNS: [&str; 9] = [
    "userid",
    "username",
    "password",
    "userlevel",
    "joindate",
    "lastlogin",
    "email",
    "location",
    "timezone",
];

/// Credential tier stored in `userlevel` for administrators.
pub const USERLEVEL_ADMIN: i64 = 9;

/// Credential tier stored in `userlevel` for ordinary members.
pub const USERLEVEL_USER: i64 = 1;

/// One stored user account.
///
/// The password field holds an already-mangled (hashed) value: the store
/// never transforms or verifies credentials, it only persists them.
/// Timestamps are epoch seconds, normalized by the lookup path so callers
/// can format them with ordinary time utilities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identity, generated by storage on creation and immutable.
    pub user_id: i64,

    /// Unique login name. Length bounds are enforced by the form
    /// validation layer, not here.
    pub username: String,

    /// Mangled password value, stored verbatim.
    pub password: String,

    /// Credential tier ([`USERLEVEL_ADMIN`] or [`USERLEVEL_USER`]).
    pub user_level: i64,

    /// Account creation time (epoch seconds), set once at creation to
    /// server time.
    pub join_date: i64,

    /// Last login time (epoch seconds). `None` until first set.
    pub last_login: Option<i64>,

    /// Contact address. Lookup by email exists but no uniqueness is
    /// enforced at this layer.
    pub email: String,

    /// Free-form location string.
    pub location: String,

    /// Free-form timezone string.
    pub timezone: String,
}

impl UserRecord {
    /// True for accounts at the administrator tier.
    pub fn is_admin(&self) -> bool {
        self.user_level == USERLEVEL_ADMIN
    }

    /// The join date as a UTC datetime, if representable.
    pub fn join_date_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.join_date, 0).single()
    }

    /// The last login as a UTC datetime, if set and representable.
    pub fn last_login_utc(&self) -> Option<DateTime<Utc>> {
        self.last_login
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    /// Decode a fetched row into a record.
    ///
    /// Expects the full column set plus the two computed epoch columns
    /// `ts_joindate` and `ts_lastlogin` produced by the lookup path. A
    /// missing or mistyped cell indicates schema drift or storage
    /// corruption, not a caller mistake.
    pub(crate) fn from_row(row: &Row) -> Result<Self, UserError> {
        Ok(Self {
            user_id: require_int(row, "userid")?,
            username: require_text(row, "username")?,
            password: require_text(row, "password")?,
            user_level: require_int(row, "userlevel")?,
            join_date: require_int(row, "ts_joindate")?,
            last_login: row.int("ts_lastlogin"),
            email: require_text(row, "email")?,
            location: require_text(row, "location")?,
            timezone: require_text(row, "timezone")?,
        })
    }
}

fn require_int(row: &Row, column: &'static str) -> Result<i64, UserError> {
    match row.get(column) {
        Some(value) => value.as_int().ok_or(UserError::ColumnType {
            column,
            expected: "integer",
        }),
        None => Err(UserError::MissingColumn { column }),
    }
}

fn require_text(row: &Row, column: &'static str) -> Result<String, UserError> {
    match row.get(column) {
        Some(value) => value
            .as_text()
            .map(str::to_string)
            .ok_or(UserError::ColumnType {
                column,
                expected: "text",
            }),
        None => Err(UserError::MissingColumn { column }),
    }
}

/// Registration data for [`UserStore::create_user`](super::UserStore::create_user).
///
/// The four string fields are required by the registration flow; the join
/// date is never taken from the caller (it is always written as server
/// time). `user_level` is written only when set, e.g. by maintenance
/// tooling creating an admin account; otherwise the storage schema default
/// applies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Already-mangled password value.
    pub password: String,
    /// Contact address.
    pub email: String,
    /// Free-form location string.
    pub location: String,
    /// Explicit credential tier, or `None` for the schema default.
    pub user_level: Option<i64>,
}

impl NewUser {
    /// Registration data with the storage-default credential tier.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            location: location.into(),
            user_level: None,
        }
    }

    /// Set an explicit credential tier.
    pub fn with_level(mut self, level: i64) -> Self {
        self.user_level = Some(level);
        self
    }
}
