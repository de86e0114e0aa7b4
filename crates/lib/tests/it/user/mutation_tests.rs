//! Mutation tests: password and lastlogin setters, raw field updates
//!
//! Setters are whole-field writes filtered on the identity column; nothing
//! is merged implicitly.

use crate::helpers::*;
use userdb::storage::{FieldMap, Timestamp, Value};

#[test]
fn test_set_password_touches_only_the_password() {
    let store = setup_store();
    let id = create_sample(&store, "alice1");
    let before = store
        .find_by_id(id)
        .expect("Lookup failed")
        .expect("User should exist");

    let affected = store.set_password(id, "newhash").expect("Update failed");
    assert_eq!(affected, 1);

    let after = store
        .find_by_id(id)
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(after.password, "newhash");

    // Every other field is unchanged
    let mut expected = before.clone();
    expected.password = "newhash".to_string();
    assert_eq!(after, expected);
}

#[test]
fn test_set_last_login_server_now() {
    let store = setup_store();
    let id = create_sample(&store, "alice1");

    let before = epoch_now();
    let affected = store
        .set_last_login(id, Timestamp::ServerNow)
        .expect("Update failed");
    assert_eq!(affected, 1);

    let record = store
        .find_by_id(id)
        .expect("Lookup failed")
        .expect("User should exist");
    let last_login = record.last_login.expect("lastlogin should be set");
    assert!(last_login >= before);
    assert!(last_login <= epoch_now());
}

#[test]
fn test_set_last_login_explicit() {
    let store = setup_store();
    let id = create_sample(&store, "alice1");

    store
        .set_last_login(id, Timestamp::Explicit(1_700_000_000))
        .expect("Update failed");

    let record = store
        .find_by_id(id)
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(record.last_login, Some(1_700_000_000));
}

#[test]
fn test_setters_on_missing_id_affect_nothing() {
    let store = setup_store();
    create_sample(&store, "alice1");

    assert_eq!(store.set_password(999, "x").expect("Update failed"), 0);
    assert_eq!(
        store
            .set_last_login(999, Timestamp::ServerNow)
            .expect("Update failed"),
        0
    );
}

#[test]
fn test_update_on_missing_id_ignores_taken_username() {
    let store = setup_store();
    create_sample(&store, "alice1");

    // Nothing matches userid 999, so writing an already-taken username
    // duplicates nothing and must report zero affected rows
    let fields = FieldMap::from([("username".to_string(), Value::text("alice1"))]);
    let affected = store
        .update_user(999, fields)
        .expect("Zero-row update should be a no-op");
    assert_eq!(affected, 0);
}

#[test]
fn test_update_user_is_a_passthrough() {
    let store = setup_store();
    let id = create_sample(&store, "alice1");

    let fields = FieldMap::from([
        ("location".to_string(), Value::text("Osaka")),
        ("timezone".to_string(), Value::text("+9.0")),
    ]);
    let affected = store.update_user(id, fields).expect("Update failed");
    assert_eq!(affected, 1);

    let record = store
        .find_by_id(id)
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(record.location, "Osaka");
    assert_eq!(record.timezone, "+9.0");
}

#[test]
fn test_update_user_unknown_column_fails_in_storage() {
    let store = setup_store();
    let id = create_sample(&store, "alice1");

    // The store validates nothing; the engine rejects the column name
    let fields = FieldMap::from([("favourite_color".to_string(), Value::text("blue"))]);
    let err = store
        .update_user(id, fields)
        .expect_err("Unknown column must fail");
    assert!(err.is_unknown_column());
    assert_eq!(err.module(), "storage");
}
