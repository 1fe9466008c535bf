//! Session store: key-addressed persistence for session records.
//!
//! Records are opaque byte blobs keyed by [`RecordKind`]; the typed helpers
//! [`load_record`] and [`save_record`] layer JSON on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::model::RecordKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("record {key} is not valid JSON: {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("record {key} could not be encoded: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("store lock poisoned")]
    Poisoned,
}

pub trait SessionStore: Send + Sync {
    /// Raw bytes for `kind`, or `None` if nothing was ever stored.
    fn get(&self, kind: RecordKind) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&self, kind: RecordKind, value: &[u8]) -> Result<(), StoreError>;

    /// Delete the record. Removing a missing record is not an error.
    fn remove(&self, kind: RecordKind) -> Result<(), StoreError>;
}

/// Read and decode a record. Empty records count as missing.
pub fn load_record<T: DeserializeOwned>(
    store: &dyn SessionStore,
    kind: RecordKind,
) -> Result<Option<T>, StoreError> {
    match store.get(kind)? {
        Some(bytes) if !bytes.is_empty() => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: kind.key(),
                source,
            }),
        _ => Ok(None),
    }
}

pub fn save_record<T: Serialize>(
    store: &dyn SessionStore,
    kind: RecordKind,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value).map_err(|source| StoreError::Encode {
        key: kind.key(),
        source,
    })?;
    store.set(kind, &bytes)
}

// ── FileStore ─────────────────────────────────────────────────────────────────

/// One `<key>.json` file per record under a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, kind: RecordKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.key()))
    }
}

impl SessionStore for FileStore {
    fn get(&self, kind: RecordKind) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(kind);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&self, kind: RecordKind, value: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        // Write-then-rename so a crash never leaves a half-written record.
        let path = self.path_for(kind);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }

    fn remove(&self, kind: RecordKind) -> Result<(), StoreError> {
        let path = self.path_for(kind);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// In-process store; counts writes per kind.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<RecordKind, Vec<u8>>>,
    sets: Mutex<HashMap<RecordKind, usize>>,
    total_sets: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw record without counting it as a write.
    pub fn with_record(self, kind: RecordKind, value: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut records) = self.records.lock() {
            records.insert(kind, value.into());
        }
        self
    }

    /// Number of `set` calls made for `kind`.
    pub fn set_count(&self, kind: RecordKind) -> usize {
        self.sets
            .lock()
            .map(|sets| sets.get(&kind).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total_sets(&self) -> usize {
        self.total_sets.load(Ordering::Relaxed)
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, kind: RecordKind) -> Result<Option<Vec<u8>>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(&kind).cloned())
    }

    fn set(&self, kind: RecordKind, value: &[u8]) -> Result<(), StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .insert(kind, value.to_vec());
        *self
            .sets
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .entry(kind)
            .or_insert(0) += 1;
        self.total_sets.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn remove(&self, kind: RecordKind) -> Result<(), StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .remove(&kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayMode;

    #[test]
    fn test_memory_store_counts_sets() {
        let store = MemoryStore::new().with_record(RecordKind::PlayMode, "\"random\"");
        assert_eq!(store.total_sets(), 0);
        let mode: Option<PlayMode> = load_record(&store, RecordKind::PlayMode).unwrap();
        assert_eq!(mode, Some(PlayMode::Random));

        save_record(&store, RecordKind::PlayMode, &PlayMode::Order).unwrap();
        assert_eq!(store.set_count(RecordKind::PlayMode), 1);
        assert_eq!(store.set_count(RecordKind::User), 0);
    }

    #[test]
    fn test_empty_record_is_missing() {
        let store = MemoryStore::new().with_record(RecordKind::User, Vec::new());
        let user: Option<crate::model::UserIdentity> =
            load_record(&store, RecordKind::User).unwrap();
        assert!(user.is_none());
    }

    #[test]
    fn test_corrupt_record_is_decode_error() {
        let store = MemoryStore::new().with_record(RecordKind::PlayMode, "{not json");
        let err = load_record::<PlayMode>(&store, RecordKind::PlayMode).unwrap_err();
        assert!(matches!(err, StoreError::Decode { key: "play_mode", .. }));
    }
}
