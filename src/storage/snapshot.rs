//! Snapshot persistence
//!
//! The whole store is written as one JSON document on every mutation and
//! read back once at startup. Writes overwrite the previous contents in
//! place and are fsynced; there is no rename-swap, so a crash mid-write
//! can leave a torn file. That torn file is reported as corrupt on the
//! next open rather than silently discarded.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::state::StoreState;

/// What to do when the snapshot exists but cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptSnapshotPolicy {
    /// Refuse to open the store
    #[default]
    Fail,
    /// Set the corrupt snapshot aside and start from an empty store
    Reset,
}

/// Durable home of the store's state
pub trait SnapshotStore: Send + Sync {
    /// Reads the persisted state.
    ///
    /// `Ok(None)` means no snapshot exists yet. A snapshot that exists but
    /// does not parse is `CATALOG_SNAPSHOT_CORRUPT`.
    fn load(&self) -> StoreResult<Option<StoreState>>;

    /// Writes the complete state, replacing whatever was there.
    fn save(&self, state: &StoreState) -> StoreResult<()>;

    /// Preserves the current (corrupt) snapshot somewhere it will not be
    /// overwritten, and returns where.
    fn quarantine(&self) -> StoreResult<String>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Snapshot kept in a single JSON file
#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the snapshot path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> StoreResult<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::persistence_failed(
                        format!("failed to create snapshot directory: {}", parent.display()),
                        e,
                    )
                })
            }
            _ => Ok(()),
        }
    }
}

impl SnapshotStore for JsonSnapshotFile {
    fn load(&self) -> StoreResult<Option<StoreState>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::persistence_failed(
                    format!("failed to read snapshot: {}", self.path.display()),
                    e,
                ))
            }
        };

        StoreState::from_json(&bytes)
            .map(Some)
            .map_err(|e| StoreError::snapshot_corrupt(&self.describe(), e.to_string()))
    }

    fn save(&self, state: &StoreState) -> StoreResult<()> {
        let bytes = state.to_pretty_json().map_err(|e| {
            StoreError::persistence_failed("failed to serialize snapshot", io::Error::from(e))
        })?;

        self.ensure_parent_dir()?;

        let write_failed = |e: io::Error| {
            StoreError::persistence_failed(
                format!("failed to write snapshot: {}", self.path.display()),
                e,
            )
        };

        let mut file = File::create(&self.path).map_err(write_failed)?;
        file.write_all(&bytes).map_err(write_failed)?;
        file.sync_all().map_err(write_failed)?;
        Ok(())
    }

    fn quarantine(&self) -> StoreResult<String> {
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".corrupt-{}", Utc::now().timestamp()));
        let backup = PathBuf::from(backup);

        fs::copy(&self.path, &backup).map_err(|e| {
            StoreError::persistence_failed(
                format!("failed to back up corrupt snapshot to {}", backup.display()),
                e,
            )
        })?;

        Ok(backup.display().to_string())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory snapshot holding the last saved document.
///
/// Saves can be switched to fail, to exercise persistence-error paths.
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    contents: Mutex<Option<Vec<u8>>>,
    quarantined: Mutex<Vec<Vec<u8>>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `bytes` as the persisted document
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Mutex::new(Some(bytes.into())),
            ..Self::default()
        }
    }

    /// Makes every subsequent save fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The last saved document, if any
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }

    /// Documents set aside by `quarantine`
    pub fn quarantined(&self) -> Vec<Vec<u8>> {
        self.quarantined
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    fn poisoned() -> StoreError {
        StoreError::persistence_failed(
            "memory snapshot lock poisoned",
            io::Error::new(io::ErrorKind::Other, "poisoned"),
        )
    }
}

impl SnapshotStore for MemorySnapshot {
    fn load(&self) -> StoreResult<Option<StoreState>> {
        let contents = self.contents.lock().map_err(|_| Self::poisoned())?;
        match contents.as_deref() {
            None => Ok(None),
            Some(bytes) => StoreState::from_json(bytes)
                .map(Some)
                .map_err(|e| StoreError::snapshot_corrupt(&self.describe(), e.to_string())),
        }
    }

    fn save(&self, state: &StoreState) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::persistence_failed(
                "failed to write snapshot: memory",
                io::Error::new(io::ErrorKind::Other, "injected save failure"),
            ));
        }

        let bytes = state.to_pretty_json().map_err(|e| {
            StoreError::persistence_failed("failed to serialize snapshot", io::Error::from(e))
        })?;
        *self.contents.lock().map_err(|_| Self::poisoned())? = Some(bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn quarantine(&self) -> StoreResult<String> {
        let current = self.contents.lock().map_err(|_| Self::poisoned())?.clone();
        let mut quarantined = self.quarantined.lock().map_err(|_| Self::poisoned())?;
        if let Some(bytes) = current {
            quarantined.push(bytes);
        }
        Ok(format!("memory#quarantine-{}", quarantined.len()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Role, User};
    use tempfile::TempDir;

    #[test]
    fn test_absent_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let snapshot = JsonSnapshotFile::new(dir.path().join("store.json"));
        assert!(snapshot.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let snapshot = JsonSnapshotFile::new(dir.path().join("nested/data/store.json"));

        let mut state = StoreState::new();
        let user = User::new("alice", "digest", "a@example.com", Role::User);
        let item = Item::new("Lamp", "", 12.5, &user.id);
        state.users.insert(user.id.clone(), user);
        state.items.insert(item.id.clone(), item);

        snapshot.save(&state).unwrap();
        assert_eq!(snapshot.load().unwrap(), Some(state));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let snapshot = JsonSnapshotFile::new(dir.path().join("store.json"));

        let mut state = StoreState::new();
        let user = User::new("alice", "digest", "a@example.com", Role::User);
        state.users.insert(user.id.clone(), user);
        snapshot.save(&state).unwrap();

        state.users.clear();
        snapshot.save(&state).unwrap();
        assert!(snapshot.load().unwrap().unwrap().users.is_empty());
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"{\"users\": {\"x\": ").unwrap();

        let err = JsonSnapshotFile::new(&path).load().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("CATALOG_SNAPSHOT_CORRUPT"));
    }

    #[test]
    fn test_quarantine_copies_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"not json").unwrap();

        let backup = JsonSnapshotFile::new(&path).quarantine().unwrap();
        assert!(backup.contains(".corrupt-"));
        assert_eq!(fs::read(&backup).unwrap(), b"not json");
        assert!(path.exists());
    }

    #[test]
    fn test_memory_snapshot_failure_injection() {
        let snapshot = MemorySnapshot::new();
        snapshot.save(&StoreState::new()).unwrap();
        assert_eq!(snapshot.save_count(), 1);

        snapshot.set_fail_saves(true);
        assert!(snapshot.save(&StoreState::new()).is_err());
        assert_eq!(snapshot.save_count(), 1);
    }
}
