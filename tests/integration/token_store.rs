//! Integration tests for the local credential store

use tempfile::TempDir;
use tripgen::auth::{StoredCredentials, TokenStore};
use tripgen::ApiError;

#[test]
fn test_save_load_clear_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let store = TokenStore::new(temp_dir.path().join("nested").join("auth.json"));
    assert!(store.load().unwrap().is_none());

    let credentials = StoredCredentials::new("tok-123", Some("me@example.com".to_string()));
    store.save(&credentials).unwrap();
    assert_eq!(store.load().unwrap(), Some(credentials));

    assert!(store.clear().unwrap());
    assert!(store.load().unwrap().is_none());
    assert!(!store.clear().unwrap(), "second clear finds nothing");
}

#[test]
fn test_save_replaces_previous_login() {
    let temp_dir = TempDir::new().unwrap();
    let store = TokenStore::new(temp_dir.path().join("auth.json"));

    store
        .save(&StoredCredentials::new("old", Some("a@example.com".to_string())))
        .unwrap();
    store
        .save(&StoredCredentials::new("new", Some("b@example.com".to_string())))
        .unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.access_token, "new");
    assert_eq!(loaded.email.as_deref(), Some("b@example.com"));
}

#[test]
fn test_corrupt_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("auth.json");
    std::fs::write(&path, "not json").unwrap();

    let err = TokenStore::new(&path).load().unwrap_err();
    assert!(matches!(err, ApiError::TokenStore(_)));
}

#[cfg(unix)]
#[test]
fn test_saved_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let store = TokenStore::new(temp_dir.path().join("auth.json"));
    store.save(&StoredCredentials::new("tok", None)).unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
