//! Migration pass tests over file-backed stores
//!
//! Seeds tier documents the way the pre-encryption scheme wrote them,
//! then verifies the startup migration upgrades entries in place.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use stashkit_lib::crypto::{cipher, legacy};
use stashkit_lib::{AuthChannel, MigrationPass, MigrationStatus, SecureStore, AUTH_NAMESPACE};
use tempfile::TempDir;

/// Write a pre-seeded tier document under the directory
fn seed_entries(dir: &TempDir, entries: &[(&str, String)]) {
    let map: HashMap<&str, &str> = entries.iter().map(|(k, v)| (*k, v.as_str())).collect();
    std::fs::write(
        dir.path().join("entries.json"),
        serde_json::to_string_pretty(&map).unwrap(),
    )
    .unwrap();
}

fn read_entry(dir: &TempDir, key: &str) -> Option<String> {
    let document = std::fs::read_to_string(dir.path().join("entries.json")).ok()?;
    let entries: HashMap<String, String> = serde_json::from_str(&document).unwrap();
    entries.get(key).cloned()
}

#[tokio::test]
async fn test_legacy_auth_entry_migrates_and_stays_readable() {
    let session_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    let value = json!({"token": "abc123"});

    seed_entries(
        &session_dir,
        &[("auth.authorized", legacy::obfuscate(&value).unwrap())],
    );

    let store = Arc::new(SecureStore::open(session_dir.path(), data_dir.path()));
    let report = MigrationPass::new(&store, AUTH_NAMESPACE).run().await;
    assert_eq!(report.migrated, 1);
    assert_eq!(report.status(), MigrationStatus::Completed);

    // The on-disk encoding now carries the cipher engine's tag
    let raw = read_entry(&session_dir, "auth.authorized").unwrap();
    assert!(raw.starts_with(cipher::SCHEME_TAG));

    // And the channel still reads the original value
    let auth = AuthChannel::new(store);
    assert_eq!(auth.get_auth::<serde_json::Value>().await, Some(value));
}

#[tokio::test]
async fn test_mixed_store_migrates_idempotently() {
    let session_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();

    let legacy_value = json!({"restored": true});
    seed_entries(
        &session_dir,
        &[("auth.session-flag", legacy::obfuscate(&legacy_value).unwrap())],
    );

    let store = Arc::new(SecureStore::open(session_dir.path(), data_dir.path()));

    // Write an already-current entry alongside the seeded legacy one
    let auth = AuthChannel::new(store.clone());
    assert!(auth.set_auth(&json!({"token": "new"})).await);

    let pass = MigrationPass::new(&store, AUTH_NAMESPACE);
    let first = pass.run().await;
    assert_eq!(first.scanned, 2);
    assert_eq!(first.migrated, 1);
    assert_eq!(first.already_current, 1);

    let flag_snapshot = read_entry(&session_dir, "auth.session-flag").unwrap();
    let auth_snapshot = read_entry(&session_dir, "auth.authorized").unwrap();
    assert!(flag_snapshot.starts_with(cipher::SCHEME_TAG));

    let second = pass.run().await;
    assert_eq!(second.migrated, 0);
    assert_eq!(second.already_current, 2);
    assert_eq!(second.status(), MigrationStatus::NotNeeded);

    // Encodings untouched by the second run, both still readable
    assert_eq!(
        read_entry(&session_dir, "auth.session-flag").unwrap(),
        flag_snapshot
    );
    assert_eq!(
        read_entry(&session_dir, "auth.authorized").unwrap(),
        auth_snapshot
    );
    assert_eq!(
        auth.get_auth::<serde_json::Value>().await,
        Some(json!({"token": "new"}))
    );
}

#[tokio::test]
async fn test_unmigratable_entry_survives_untouched() {
    let session_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();

    seed_entries(
        &session_dir,
        &[
            ("auth.broken", "%% not base64, not json %%".to_string()),
            (
                "auth.authorized",
                legacy::obfuscate(&json!({"token": "ok"})).unwrap(),
            ),
        ],
    );

    let store = Arc::new(SecureStore::open(session_dir.path(), data_dir.path()));
    let report = MigrationPass::new(&store, AUTH_NAMESPACE).run().await;

    assert_eq!(report.migrated, 1);
    assert_eq!(report.unmigratable, 1);
    assert_eq!(report.status(), MigrationStatus::PartiallyCompleted);

    // The broken entry was neither deleted nor rewritten
    assert_eq!(
        read_entry(&session_dir, "auth.broken").unwrap(),
        "%% not base64, not json %%"
    );
}

#[tokio::test]
async fn test_config_namespace_not_scanned() {
    let session_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();

    // Raw JSON configuration in the persistent tier: untagged, but must
    // not be treated as a legacy blob
    seed_entries(&data_dir, &[("config.locale", r#""en-US""#.to_string())]);

    let store = Arc::new(SecureStore::open(session_dir.path(), data_dir.path()));
    let report = MigrationPass::new(&store, AUTH_NAMESPACE).run().await;

    assert_eq!(report.scanned, 0);
    assert_eq!(
        read_entry(&data_dir, "config.locale").unwrap(),
        r#""en-US""#
    );
}
