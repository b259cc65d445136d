//! Persisted snapshot store.
//!
//! Snapshots are the bridge between the in-memory collection and durable
//! client-side storage. Loading never fails: corrupt or unknown data is
//! logged and treated as an empty collection. Saving is best-effort.

use crate::{error::Result, Collection, CollectionItem, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// Version of the snapshot format for future compatibility.
///
/// Version 0 is the legacy layout: a bare JSON array of items.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "tote.wishlist";

/// Why a stored snapshot could not be read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageCorruption {
    #[error("malformed snapshot: {0}")]
    Malformed(String),

    #[error("unsupported snapshot format version: {found} (max supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// The on-disk envelope around a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub format_version: u32,
    pub saved_at: DateTime<Utc>,
    pub items: Vec<CollectionItem>,
}

impl PersistedSnapshot {
    /// Capture a collection at the current format version.
    pub fn capture(collection: &Collection) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            saved_at: Utc::now(),
            items: collection.items().to_vec(),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Decode stored text, migrating the legacy layout.
    ///
    /// Uniqueness is not checked here; the engine repairs duplicates.
    pub fn decode(raw: &str) -> std::result::Result<Self, StorageCorruption> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| StorageCorruption::Malformed(e.to_string()))?;

        if value.is_array() {
            let items: Vec<CollectionItem> = serde_json::from_value(value)
                .map_err(|e| StorageCorruption::Malformed(e.to_string()))?;
            debug!(items = items.len(), "migrating legacy snapshot");
            return Ok(Self {
                format_version: SNAPSHOT_FORMAT_VERSION,
                saved_at: Utc::now(),
                items,
            });
        }

        let found = value
            .get("formatVersion")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| StorageCorruption::Malformed("missing formatVersion".into()))?;
        if found > u64::from(SNAPSHOT_FORMAT_VERSION) {
            return Err(StorageCorruption::UnsupportedVersion {
                found: u32::try_from(found).unwrap_or(u32::MAX),
                supported: SNAPSHOT_FORMAT_VERSION,
            });
        }

        serde_json::from_value(value).map_err(|e| StorageCorruption::Malformed(e.to_string()))
    }

    pub fn into_collection(self) -> Collection {
        let (collection, _) = Collection::repair(self.items);
        collection
    }
}

/// Durable storage for the collection under one fixed key.
///
/// Only the engine writes through this trait.
pub trait SnapshotStore: Send + Sync {
    /// Load the stored items. Never fails; returns empty on any problem.
    fn load(&self) -> Vec<CollectionItem>;

    /// Persist the collection. Failures are logged, not returned.
    fn save(&self, collection: &Collection);
}

/// Decode text loaded from storage, degrading to empty on corruption.
fn decode_or_empty(raw: &str, source: &str) -> Vec<CollectionItem> {
    match PersistedSnapshot::decode(raw) {
        Ok(snapshot) => snapshot.items,
        Err(e) => {
            warn!(source, error = %e, "discarding unreadable snapshot");
            Vec::new()
        }
    }
}

/// Snapshot store backed by a JSON file named after the storage key.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, json: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Vec<CollectionItem> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode_or_empty(&raw, &self.path.display().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot yet");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read snapshot");
                Vec::new()
            }
        }
    }

    fn save(&self, collection: &Collection) {
        let json = match PersistedSnapshot::capture(collection).to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode snapshot");
                return;
            }
        };
        if let Err(e) = self.write(&json) {
            warn!(path = %self.path.display(), error = %e, "failed to write snapshot");
        }
    }
}

/// In-process snapshot store holding the raw stored text.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    raw: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with arbitrary stored text, e.g. a legacy or corrupt payload.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
            saves: AtomicUsize::new(0),
        }
    }

    /// The currently stored text.
    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Vec<CollectionItem> {
        match self.raw() {
            Some(raw) => decode_or_empty(&raw, "memory"),
            None => Vec::new(),
        }
    }

    fn save(&self, collection: &Collection) {
        match PersistedSnapshot::capture(collection).to_json() {
            Ok(json) => {
                *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(json);
                self.saves.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => warn!(error = %e, "failed to encode snapshot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProductSnapshot;

    fn sample() -> Collection {
        let mut collection = Collection::new();
        collection
            .insert(CollectionItem::new("1", ProductSnapshot::titled("Lamp"), None))
            .unwrap();
        collection
            .insert(CollectionItem::new(
                "2",
                ProductSnapshot::titled("Rug"),
                Some("alice".into()),
            ))
            .unwrap();
        collection
    }

    #[test]
    fn envelope_carries_format_version() {
        let json = PersistedSnapshot::capture(&sample()).to_json().unwrap();
        assert!(json.contains("\"formatVersion\":1"));
        assert!(json.contains("savedAt"));
    }

    #[test]
    fn memory_store_persists_collection() {
        let store = MemorySnapshotStore::new();
        let collection = sample();

        store.save(&collection);

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load(), collection.into_items());
    }

    #[test]
    fn corrupt_text_loads_empty() {
        let store = MemorySnapshotStore::with_raw("{not json");
        assert!(store.load().is_empty());

        let store = MemorySnapshotStore::with_raw(r#"{"items": []}"#);
        assert!(store.load().is_empty());
    }

    #[test]
    fn future_format_version_rejected() {
        let json = r#"{
            "formatVersion": 999,
            "savedAt": "2024-01-01T00:00:00Z",
            "items": []
        }"#;

        let result = PersistedSnapshot::decode(json);
        assert!(matches!(
            result,
            Err(StorageCorruption::UnsupportedVersion { found: 999, .. })
        ));
        assert!(MemorySnapshotStore::with_raw(json).load().is_empty());
    }

    #[test]
    fn legacy_array_is_migrated() {
        let legacy = r#"[
            {"id": "a", "productId": "5", "product": {"title": "Vase"}, "addedAt": "2023-05-01T10:00:00Z"}
        ]"#;

        let snapshot = PersistedSnapshot::decode(legacy).unwrap();
        assert_eq!(snapshot.format_version, SNAPSHOT_FORMAT_VERSION);
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].product_id, "5");
    }

    #[test]
    fn decode_does_not_enforce_uniqueness() {
        let dup = r#"{
            "formatVersion": 1,
            "savedAt": "2024-01-01T00:00:00Z",
            "items": [
                {"id": "a", "productId": "5", "product": {"title": "Vase"}, "addedAt": "2023-05-01T10:00:00Z"},
                {"id": "b", "productId": "5", "product": {"title": "Vase"}, "addedAt": "2023-05-01T10:00:00Z"}
            ]
        }"#;

        let snapshot = PersistedSnapshot::decode(dup).unwrap();
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.into_collection().len(), 1);
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested"), DEFAULT_STORAGE_KEY);
        assert!(store.load().is_empty());

        let collection = sample();
        store.save(&collection);

        assert!(store.path().ends_with("tote.wishlist.json"));
        let reopened = FileSnapshotStore::new(dir.path().join("nested"), DEFAULT_STORAGE_KEY);
        assert_eq!(reopened.load(), collection.into_items());
    }

    #[test]
    fn file_store_recovers_from_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path(), "cart");
        fs::write(store.path(), b"\x00\x01garbage").unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn file_store_save_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"file, not a directory").unwrap();

        let store = FileSnapshotStore::new(&blocker, "cart");
        store.save(&sample());
        assert!(store.load().is_empty());
    }
}
