//! Creation tests: required fields, schema defaults, server-side join date,
//! uniqueness delegation

use crate::helpers::*;
use userdb::user::record::{USERLEVEL_ADMIN, USERLEVEL_USER};

#[test]
fn test_created_record_carries_registration_fields() {
    let store = setup_store();
    let before = epoch_now();
    create_sample(&store, "alice1");

    let record = store
        .find_by_username("alice1")
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(record.password, "hashed123"); // stored verbatim, already mangled
    assert_eq!(record.location, "Test City");
    assert_eq!(record.email, "alice1@example.com");

    // joindate is written server-side, never taken from the caller
    assert!(record.join_date >= before);
    assert!(record.join_date <= epoch_now());
}

#[test]
fn test_defaults_apply_when_not_supplied() {
    let store = setup_store();
    create_sample(&store, "alice1");

    let record = store
        .find_by_username("alice1")
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(record.user_level, USERLEVEL_USER); // schema default
    assert_eq!(record.last_login, None);
    assert_eq!(record.timezone, "");
    assert!(!record.is_admin());
}

#[test]
fn test_explicit_userlevel_is_honored() {
    let store = setup_store();
    let admin = sample_user("admin1").with_level(USERLEVEL_ADMIN);
    let id = store.create_user(&admin).expect("Failed to create user");

    let record = store
        .find_by_id(id)
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(record.user_level, USERLEVEL_ADMIN);
    assert!(record.is_admin());
}

#[test]
fn test_duplicate_username_is_rejected_by_storage() {
    let store = setup_store();
    create_sample(&store, "alice1");

    let err = store
        .create_user(&sample_user("alice1"))
        .expect_err("Duplicate username must fail");
    assert!(err.is_unique_violation());
    assert_eq!(err.module(), "storage");

    // The first record is untouched
    assert!(store.username_exists("alice1").expect("Count failed"));
    assert_eq!(store.storage().len(), 1);
}

#[test]
fn test_generated_ids_are_distinct() {
    let store = setup_store();
    let a = create_sample(&store, "alice1");
    let b = create_sample(&store, "bobby1");
    assert_ne!(a, b);
}
