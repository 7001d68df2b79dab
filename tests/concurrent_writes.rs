//! Concurrent Access Tests
//!
//! Tests for guarantees:
//! - N threads each creating one record leave exactly N records
//! - Readers running alongside writers never observe a torn collection
//! - The persisted snapshot matches memory once all writers finish

use std::sync::Arc;
use std::thread;

use catalogdb::model::{Item, Tag};
use catalogdb::storage::{CorruptSnapshotPolicy, MemorySnapshot, RecordStore, StoreState};

const WRITERS: usize = 16;
const WRITES_PER_THREAD: usize = 25;

#[test]
fn test_parallel_creates_are_all_kept() {
    let store = Arc::new(RecordStore::in_memory().unwrap());

    let handles: Vec<_> = (0..WRITERS)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                store
                    .create(Item::new(format!("item-{}", t), "", t as f64, "u1"))
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len::<Item>().unwrap(), WRITERS);
}

#[test]
fn test_readers_and_writers_interleave() {
    let store = Arc::new(RecordStore::in_memory().unwrap());
    let mut handles = Vec::new();

    for t in 0..WRITERS {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            for i in 0..WRITES_PER_THREAD {
                store.create(Tag::new(format!("t{}-{}", t, i), "u1")).unwrap();
            }
        }));
    }

    for _ in 0..4 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                let tags = store.list::<Tag>().unwrap();
                // Every tag seen is complete
                assert!(tags.iter().all(|tag| tag.name.starts_with('t')));
                assert!(tags.len() <= WRITERS * WRITES_PER_THREAD);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len::<Tag>().unwrap(), WRITERS * WRITES_PER_THREAD);
}

#[test]
fn test_snapshot_matches_memory_after_parallel_writes() {
    let snapshot = Arc::new(MemorySnapshot::new());
    let store = Arc::new(RecordStore::open(snapshot.clone(), CorruptSnapshotPolicy::Fail).unwrap());

    let handles: Vec<_> = (0..WRITERS)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                store.create(Tag::new(format!("t{}", t), "u1")).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let bytes = snapshot.contents().unwrap();
    let persisted = StoreState::from_json(&bytes).unwrap();
    assert_eq!(persisted.tags.len(), WRITERS);
    assert_eq!(snapshot.save_count(), WRITERS + 1);
}
