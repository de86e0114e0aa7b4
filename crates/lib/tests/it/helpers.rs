//! Shared helper functions for record store testing
//!
//! Stores are backed by the in-memory `users` table with the production
//! schema defaults, so tests exercise the same uniqueness and default
//! behavior the real storage layer provides.

#![allow(dead_code)]

use userdb::storage::InMemoryTable;
use userdb::user::{NewUser, UserStore, users_table};

/// Create a store over a fresh in-memory `users` table.
pub fn setup_store() -> UserStore<InMemoryTable> {
    UserStore::new(users_table())
}

/// Registration data for `username` with fixed password/email/location.
pub fn sample_user(username: &str) -> NewUser {
    NewUser::new(
        username,
        "hashed123",
        format!("{username}@example.com"),
        "Test City",
    )
}

/// Create a user and return its generated id.
pub fn create_sample(store: &UserStore<InMemoryTable>, username: &str) -> i64 {
    store
        .create_user(&sample_user(username))
        .expect("Failed to create user")
}

/// Current system time as epoch seconds, for bounding server-written
/// timestamps.
pub fn epoch_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("System time before epoch")
        .as_secs() as i64
}
