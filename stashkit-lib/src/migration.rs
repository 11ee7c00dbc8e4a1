//! Migration from legacy-obfuscated entries to the cipher engine.

use crate::crypto::{cipher, legacy};
use crate::record::StoredRecord;
use crate::store::SecureStore;

/// Outcome of a migration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStatus {
    /// Every scanned entry already carried the current scheme.
    NotNeeded,
    /// All legacy entries were re-encoded.
    Completed,
    /// Some entries could not be migrated and were left untouched.
    PartiallyCompleted,
}

/// Counters reported by a migration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Entries examined under the namespace.
    pub scanned: usize,
    /// Legacy entries re-encoded with the cipher engine.
    pub migrated: usize,
    /// Entries already carrying the current scheme (or empty).
    pub already_current: usize,
    /// Entries that failed legacy decoding or could not be rewritten;
    /// left in place.
    pub unmigratable: usize,
}

impl MigrationReport {
    /// Overall status derived from the counters.
    pub fn status(&self) -> MigrationStatus {
        if self.unmigratable > 0 {
            MigrationStatus::PartiallyCompleted
        } else if self.migrated > 0 {
            MigrationStatus::Completed
        } else {
            MigrationStatus::NotNeeded
        }
    }
}

/// One-shot pass that re-encodes legacy entries with the cipher engine.
///
/// Invoked at startup by the embedding application. Idempotent: entries
/// already carrying the cipher engine's scheme tag are skipped, so a
/// second run is a no-op. Entries that fail legacy decoding are left
/// untouched and logged; the pass never deletes anything.
pub struct MigrationPass<'a> {
    store: &'a SecureStore,
    namespace: String,
}

impl<'a> MigrationPass<'a> {
    /// Create a pass over the given namespace (the encrypted authorization
    /// namespace; the plaintext configuration namespace is never passed
    /// here).
    pub fn new(store: &'a SecureStore, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Scan the session and persistent tiers and re-encode legacy entries
    /// in place.
    pub async fn run(&self) -> MigrationReport {
        let mut report = MigrationReport::default();
        for persistent in [false, true] {
            self.migrate_tier(persistent, &mut report).await;
        }
        tracing::info!(
            "Migration pass finished for {}: {} scanned, {} migrated, {} unmigratable",
            self.namespace,
            report.scanned,
            report.migrated,
            report.unmigratable
        );
        report
    }

    async fn migrate_tier(&self, persistent: bool, report: &mut MigrationReport) {
        for (key, raw) in self.store.tiers().scan_tier(persistent) {
            if !key.starts_with(&self.namespace) {
                continue;
            }
            report.scanned += 1;

            if raw.is_empty() || StoredRecord::is_current_scheme(&raw) {
                report.already_current += 1;
                continue;
            }

            let value: serde_json::Value = match legacy::deobfuscate(&raw) {
                Some(value) => value,
                None => {
                    tracing::warn!(
                        "Entry {} not decodable with legacy codec, leaving untouched",
                        key
                    );
                    report.unmigratable += 1;
                    continue;
                }
            };

            let device_key = self.store.key_manager().get_or_create_key().await;
            let encoded = match cipher::encrypt(&device_key, &value) {
                Ok(encoded) => encoded,
                Err(e) => {
                    tracing::warn!(
                        "Re-encryption failed for {}, leaving entry untouched: {}",
                        key,
                        e
                    );
                    report.unmigratable += 1;
                    continue;
                }
            };

            match self.store.tiers().overwrite_in_tier(persistent, &key, &encoded) {
                Ok(()) => report.migrated += 1,
                Err(e) => {
                    tracing::warn!("Tier rejected migrated entry {}, leaving original: {}", key, e);
                    report.unmigratable += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SlotOptions;
    use crate::test_utils::memory_store;
    use serde_json::json;

    #[tokio::test]
    async fn test_migrates_legacy_entry_in_place() {
        let store = memory_store();
        let value = json!({"token": "abc123"});

        let tagged = legacy::obfuscate(&value).unwrap();
        store.tiers().write("auth.authorized", &tagged, false);

        let report = MigrationPass::new(&store, "auth.").run().await;
        assert_eq!(report.scanned, 1);
        assert_eq!(report.migrated, 1);
        assert_eq!(report.status(), MigrationStatus::Completed);

        // The entry now carries the cipher engine's tag and still decodes
        // to the original value
        let raw = store.tiers().read("auth.authorized", false).unwrap();
        assert!(raw.starts_with(cipher::SCHEME_TAG));

        let loaded: Option<serde_json::Value> = store
            .get("auth.authorized", SlotOptions::new().encrypted())
            .await;
        assert_eq!(loaded, Some(value));
    }

    #[tokio::test]
    async fn test_running_twice_is_noop() {
        let store = memory_store();
        let options = SlotOptions::new().encrypted();

        // One legacy entry, one already-migrated entry
        let legacy_value = json!({"token": "legacy"});
        store
            .tiers()
            .write("auth.old", &legacy::obfuscate(&legacy_value).unwrap(), false);
        store.set("auth.new", &json!({"token": "new"}), options).await;

        let first = MigrationPass::new(&store, "auth.").run().await;
        assert_eq!(first.migrated, 1);
        assert_eq!(first.already_current, 1);

        let after_first = store.tiers().read("auth.old", false).unwrap();

        let second = MigrationPass::new(&store, "auth.").run().await;
        assert_eq!(second.migrated, 0);
        assert_eq!(second.already_current, 2);
        assert_eq!(second.status(), MigrationStatus::NotNeeded);

        // Encodings unchanged by the second run, both still decodable
        assert_eq!(store.tiers().read("auth.old", false).unwrap(), after_first);
        assert_eq!(
            store.get::<serde_json::Value>("auth.old", options).await,
            Some(legacy_value)
        );
        assert_eq!(
            store.get::<serde_json::Value>("auth.new", options).await,
            Some(json!({"token": "new"}))
        );
    }

    #[tokio::test]
    async fn test_undecodable_entry_left_untouched() {
        let store = memory_store();
        let garbage = "!!! neither base64 nor json !!!";
        store.tiers().write("auth.broken", garbage, false);

        let report = MigrationPass::new(&store, "auth.").run().await;
        assert_eq!(report.unmigratable, 1);
        assert_eq!(report.migrated, 0);
        assert_eq!(report.status(), MigrationStatus::PartiallyCompleted);

        // Never deleted, never rewritten
        assert_eq!(
            store.tiers().read("auth.broken", false),
            Some(garbage.to_string())
        );
    }

    #[tokio::test]
    async fn test_other_namespaces_skipped() {
        let store = memory_store();

        // A plaintext configuration entry must not be touched even though
        // it carries no scheme tag
        store
            .set("config.theme", &json!({"dark": true}), SlotOptions::new().persistent())
            .await;

        let report = MigrationPass::new(&store, "auth.").run().await;
        assert_eq!(report.scanned, 0);

        let raw = store.tiers().read("config.theme", true).unwrap();
        assert_eq!(raw, r#"{"dark":true}"#);
    }

    #[tokio::test]
    async fn test_scans_both_session_and_persistent() {
        let store = memory_store();
        let value = json!("v");

        let tagged = legacy::obfuscate(&value).unwrap();
        store.tiers().write("auth.session-entry", &tagged, false);
        store.tiers().write("auth.persistent-entry", &tagged, true);

        let report = MigrationPass::new(&store, "auth.").run().await;
        assert_eq!(report.scanned, 2);
        assert_eq!(report.migrated, 2);

        assert!(store
            .tiers()
            .read("auth.session-entry", false)
            .unwrap()
            .starts_with(cipher::SCHEME_TAG));
        assert!(store
            .tiers()
            .read("auth.persistent-entry", true)
            .unwrap()
            .starts_with(cipher::SCHEME_TAG));
    }
}
