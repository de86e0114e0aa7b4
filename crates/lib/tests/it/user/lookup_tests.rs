//! Lookup tests: find by username/id/email, id shortcut, existence check
//!
//! Misses are a normal branch (`Ok(None)`), never an error.

use crate::helpers::*;

#[test]
fn test_find_by_username_after_create() {
    let store = setup_store();
    create_sample(&store, "alice1");

    let record = store
        .find_by_username("alice1")
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(record.username, "alice1");
    assert_eq!(record.email, "alice1@example.com");
}

#[test]
fn test_find_by_username_miss_is_none() {
    let store = setup_store();
    create_sample(&store, "alice1");

    let result = store.find_by_username("nonexistent").expect("Lookup failed");
    assert!(result.is_none(), "Miss must be Ok(None), not an error");
}

#[test]
fn test_find_by_id_roundtrip() {
    let store = setup_store();
    let id = create_sample(&store, "alice1");

    let record = store
        .find_by_id(id)
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(record.user_id, id);
    assert_eq!(record.username, "alice1");

    assert!(store.find_by_id(id + 999).expect("Lookup failed").is_none());
}

#[test]
fn test_find_by_email() {
    let store = setup_store();
    create_sample(&store, "alice1");
    create_sample(&store, "bobby1");

    let record = store
        .find_by_email("bobby1@example.com")
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(record.username, "bobby1");
}

#[test]
fn test_find_by_email_duplicates_return_first_match() {
    let store = setup_store();
    let first = create_sample(&store, "alice1");

    // Email is not unique at this layer
    let mut second = sample_user("bobby1");
    second.email = "alice1@example.com".to_string();
    store.create_user(&second).expect("Failed to create user");

    let record = store
        .find_by_email("alice1@example.com")
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(record.user_id, first);
}

#[test]
fn test_user_id_matches_full_record() {
    let store = setup_store();
    let id = create_sample(&store, "alice1");

    let shortcut = store
        .user_id("alice1")
        .expect("Lookup failed")
        .expect("User should exist");
    let record = store
        .find_by_id(shortcut)
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(shortcut, id);
    assert_eq!(record.user_id, shortcut);

    assert!(store.user_id("nonexistent").expect("Lookup failed").is_none());
}

#[test]
fn test_username_exists_flips_on_creation() {
    let store = setup_store();
    assert!(!store.username_exists("alice1").expect("Count failed"));

    create_sample(&store, "alice1");
    assert!(store.username_exists("alice1").expect("Count failed"));
    assert!(!store.username_exists("bobby1").expect("Count failed"));
}
