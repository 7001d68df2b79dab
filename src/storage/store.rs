//! The record store
//!
//! One `RwLock` guards the whole state. Reads take it shared; every
//! mutation takes it exclusive, changes memory, then writes the full
//! snapshot before the lock is released. A failed write is reported to
//! the caller, but the in-memory change stands: there is no rollback.

use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::errors::{StoreError, StoreErrorCode, StoreResult};
use super::record::Record;
use super::snapshot::{CorruptSnapshotPolicy, JsonSnapshotFile, MemorySnapshot, SnapshotStore};
use super::state::StoreState;
use crate::analytics::{newest_first, AnalyticsAggregator};
use crate::model::{Analytics, AuditLog, Item, Role, User};
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::query::{Page, PageRequest, QueryExecutor, Queryable};

/// Lock-guarded catalog state backed by a snapshot
pub struct RecordStore {
    state: RwLock<StoreState>,
    snapshot: Arc<dyn SnapshotStore>,
}

impl RecordStore {
    /// Opens the store from `snapshot`.
    ///
    /// An absent snapshot starts an empty store and writes it immediately.
    /// A corrupt snapshot fails the open, or under
    /// [`CorruptSnapshotPolicy::Reset`] is backed up and replaced with an
    /// empty store.
    pub fn open(
        snapshot: Arc<dyn SnapshotStore>,
        policy: CorruptSnapshotPolicy,
    ) -> StoreResult<Self> {
        let location = snapshot.describe();

        let state = match snapshot.load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                let state = StoreState::new();
                snapshot.save(&state)?;
                log_event_with_fields(Event::SnapshotCreated, &[("snapshot", location.as_str())]);
                state
            }
            Err(err) if err.code() == StoreErrorCode::CatalogSnapshotCorrupt => match policy {
                CorruptSnapshotPolicy::Fail => {
                    log_event_with_fields(
                        Event::SnapshotCorrupt,
                        &[("snapshot", location.as_str()), ("reason", err.message())],
                    );
                    return Err(err);
                }
                CorruptSnapshotPolicy::Reset => {
                    let backup = snapshot.quarantine()?;
                    log_event_with_fields(
                        Event::SnapshotReset,
                        &[
                            ("backup", backup.as_str()),
                            ("reason", err.message()),
                            ("snapshot", location.as_str()),
                        ],
                    );
                    let state = StoreState::new();
                    snapshot.save(&state)?;
                    state
                }
            },
            Err(err) => return Err(err),
        };

        log_event_with_fields(
            Event::StoreOpened,
            &[
                ("snapshot", location.as_str()),
                ("users", state.users.len().to_string().as_str()),
                ("items", state.items.len().to_string().as_str()),
                ("audit_logs", state.audit_logs.len().to_string().as_str()),
            ],
        );

        Ok(Self {
            state: RwLock::new(state),
            snapshot,
        })
    }

    /// Opens a store persisted to the JSON file at `path`
    pub fn open_file(path: impl AsRef<Path>, policy: CorruptSnapshotPolicy) -> StoreResult<Self> {
        Self::open(
            Arc::new(JsonSnapshotFile::new(path.as_ref())),
            policy,
        )
    }

    /// Opens an empty store persisted only in memory
    pub fn in_memory() -> StoreResult<Self> {
        Self::open(Arc::new(MemorySnapshot::new()), CorruptSnapshotPolicy::Fail)
    }

    /// Where the snapshot lives
    pub fn describe(&self) -> String {
        self.snapshot.describe()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| StoreError::lock_poisoned())
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| StoreError::lock_poisoned())
    }

    // Called with the write lock held.
    fn persist(&self, state: &StoreState) -> StoreResult<()> {
        self.snapshot.save(state).map_err(|err| {
            log_event_with_fields(
                Event::SnapshotSaveFailed,
                &[("error", err.to_string().as_str()), ("snapshot", self.describe().as_str())],
            );
            err
        })
    }

    // ==================
    // Generic CRUD
    // ==================

    /// Returns a copy of the record with `id`
    pub fn get<T: Record>(&self, id: &str) -> StoreResult<T> {
        let state = self.read()?;
        T::collection(&state)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    /// Returns the first record whose `field` equals `value`.
    ///
    /// Linear scan; which record wins among several matches is
    /// unspecified.
    pub fn get_by_field<T: Record>(&self, field: &str, value: &str) -> StoreResult<T> {
        let state = self.read()?;
        T::collection(&state)
            .values()
            .find(|record| record.field(field).as_deref() == Some(value))
            .cloned()
            .ok_or_else(|| StoreError::not_found_by_field(T::KIND, field, value))
    }

    /// Inserts `record`, replacing any record with the same id
    pub fn create<T: Record>(&self, record: T) -> StoreResult<()> {
        let mut state = self.write()?;
        T::collection_mut(&mut state).insert(record.id().to_string(), record);
        self.persist(&state)
    }

    /// Replaces the stored record with the same id and refreshes its
    /// updated timestamp. Returns the record as stored.
    pub fn update<T: Record>(&self, mut record: T) -> StoreResult<T> {
        let mut state = self.write()?;
        let collection = T::collection_mut(&mut state);
        if !collection.contains_key(record.id()) {
            return Err(StoreError::not_found(T::KIND, record.id()));
        }

        record.touch(Utc::now());
        collection.insert(record.id().to_string(), record.clone());
        self.persist(&state)?;
        Ok(record)
    }

    /// Removes the record with `id`
    pub fn delete<T: Record>(&self, id: &str) -> StoreResult<()> {
        let mut state = self.write()?;
        if T::collection_mut(&mut state).remove(id).is_none() {
            return Err(StoreError::not_found(T::KIND, id));
        }
        self.persist(&state)
    }

    /// Copies every record of the collection, in no particular order
    pub fn list<T: Record>(&self) -> StoreResult<Vec<T>> {
        let state = self.read()?;
        Ok(T::collection(&state).values().cloned().collect())
    }

    /// Number of records in the collection
    pub fn len<T: Record>(&self) -> StoreResult<usize> {
        let state = self.read()?;
        Ok(T::collection(&state).len())
    }

    // ==================
    // Queries
    // ==================

    /// One filtered, sorted page of the collection
    pub fn query<T: Record + Queryable>(&self, request: &PageRequest) -> StoreResult<Page<T>> {
        let records = self.list::<T>()?;
        Ok(QueryExecutor::execute(records, request))
    }

    /// Case-insensitive substring search over the collection's text fields
    pub fn search<T: Record + Queryable>(&self, needle: &str) -> StoreResult<Vec<T>> {
        let state = self.read()?;
        Ok(QueryExecutor::search(T::collection(&state).values(), needle))
    }

    pub fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        self.get_by_field::<User>("username", username)
    }

    /// Sets a user's role in place, leaving every other field as stored
    pub fn update_user_role(&self, id: &str, role: Role) -> StoreResult<User> {
        let mut state = self.write()?;
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(User::KIND, id))?;
        user.role = role;
        user.touch(Utc::now());
        let updated = user.clone();
        self.persist(&state)?;
        Ok(updated)
    }

    /// Items whose category is `category_id`
    pub fn items_by_category(&self, category_id: &str) -> StoreResult<Vec<Item>> {
        let state = self.read()?;
        Ok(state
            .items
            .values()
            .filter(|item| item.category_id == category_id)
            .cloned()
            .collect())
    }

    /// Items carrying the tag `tag_id`
    pub fn items_by_tag(&self, tag_id: &str) -> StoreResult<Vec<Item>> {
        let state = self.read()?;
        Ok(state
            .items
            .values()
            .filter(|item| item.has_tag(tag_id))
            .cloned()
            .collect())
    }

    /// Audit entries, newest first. `limit <= 0` returns all of them.
    pub fn audit_logs(&self, limit: i64) -> StoreResult<Vec<AuditLog>> {
        let state = self.read()?;
        let mut logs: Vec<AuditLog> = state.audit_logs.values().cloned().collect();
        logs.sort_by(newest_first);
        if limit > 0 {
            logs.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(logs)
    }

    // ==================
    // Analytics
    // ==================

    /// The cached analytics, as of the last refresh
    pub fn analytics(&self) -> StoreResult<Analytics> {
        Ok(self.read()?.analytics.clone())
    }

    /// Recomputes analytics from current state, caches and persists them
    pub fn refresh_analytics(&self) -> StoreResult<Analytics> {
        let scope = ObservationScope::new("ANALYTICS_REFRESH");

        let mut state = self.write()?;
        let analytics = AnalyticsAggregator::compute(&state, Utc::now());
        state.analytics = analytics.clone();

        if let Err(err) = self.persist(&state) {
            scope.fail(err.code().code());
            return Err(err);
        }
        drop(state);

        scope.complete_with_fields(&[("items", analytics.total_items.to_string().as_str())]);
        log_event_with_fields(
            Event::AnalyticsRefreshed,
            &[("updated_at", analytics.updated_at.to_rfc3339().as_str())],
        );
        Ok(analytics)
    }

    /// Copy of the entire state
    pub fn state(&self) -> StoreResult<StoreState> {
        Ok(self.read()?.clone())
    }
}
