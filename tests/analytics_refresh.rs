//! Analytics Refresh Tests
//!
//! Tests for guarantees:
//! - Analytics are a cached snapshot, stale until refreshed
//! - Popular categories and tags rank by item count, at most five
//! - Recent activity lists at most ten audit entries, newest first
//! - A refresh is persisted like any other mutation

use std::sync::Arc;

use catalogdb::model::{AuditAction, AuditLog, Category, EntityKind, Item, Role, Tag, User};
use catalogdb::storage::{CorruptSnapshotPolicy, MemorySnapshot, RecordStore, StoreState};

// =============================================================================
// Test Utilities
// =============================================================================

fn add_category(store: &RecordStore, name: &str) -> Category {
    let category = Category::new(name, "", "u1");
    store.create(category.clone()).unwrap();
    category
}

fn add_items(store: &RecordStore, category: &Category, count: usize) {
    for i in 0..count {
        store
            .create(
                Item::new(format!("{}-{}", category.name, i), "", 1.0, "u1")
                    .with_category(&category.id),
            )
            .unwrap();
    }
}

// =============================================================================
// Staleness
// =============================================================================

#[test]
fn test_analytics_are_stale_until_refreshed() {
    let store = RecordStore::in_memory().unwrap();
    let c = add_category(&store, "C");
    add_items(&store, &c, 3);

    let cached = store.analytics().unwrap();
    assert_eq!(cached.total_items, 0);
    assert!(cached.popular_categories.is_empty());

    let fresh = store.refresh_analytics().unwrap();
    assert_eq!(fresh.total_items, 3);
    assert_eq!(fresh.total_categories, 1);
    assert_eq!(store.analytics().unwrap(), fresh);
}

// =============================================================================
// Popularity
// =============================================================================

#[test]
fn test_popular_categories_rank_by_item_count() {
    let store = RecordStore::in_memory().unwrap();
    let a = add_category(&store, "A");
    let b = add_category(&store, "B");
    let c = add_category(&store, "C");
    add_items(&store, &a, 1);
    add_items(&store, &b, 2);
    add_items(&store, &c, 3);

    let analytics = store.refresh_analytics().unwrap();
    let top = &analytics.popular_categories[0];
    assert_eq!(top.name, "C");
    assert_eq!(top.count, 3);
    assert_eq!(analytics.popular_category_names(), vec!["C", "B", "A"]);
}

#[test]
fn test_popular_lists_are_capped_at_five() {
    let store = RecordStore::in_memory().unwrap();
    for i in 0..7 {
        let category = add_category(&store, &format!("cat-{}", i));
        add_items(&store, &category, i + 1);
    }

    let analytics = store.refresh_analytics().unwrap();
    assert_eq!(analytics.popular_categories.len(), 5);
    assert_eq!(analytics.popular_categories[0].count, 7);
    assert_eq!(analytics.popular_categories[4].count, 3);
}

#[test]
fn test_unreferenced_and_dangling_ids_are_not_ranked() {
    let store = RecordStore::in_memory().unwrap();
    let used = Tag::new("used", "u1");
    let unused = Tag::new("unused", "u1");
    store.create(used.clone()).unwrap();
    store.create(unused.clone()).unwrap();
    store
        .create(Item::new("Lamp", "", 1.0, "u1").with_tags([used.id.clone(), "ghost".to_string()]))
        .unwrap();

    let analytics = store.refresh_analytics().unwrap();
    assert_eq!(analytics.popular_tag_names(), vec!["used"]);
}

#[test]
fn test_repeated_tag_counts_once_per_item() {
    let store = RecordStore::in_memory().unwrap();
    let lamp = Tag::new("lamp", "u1");
    let desk = Tag::new("desk", "u1");
    store.create(lamp.clone()).unwrap();
    store.create(desk.clone()).unwrap();

    let item = Item::new("Lamp", "", 1.0, "u1").with_tags([lamp.id.clone(), lamp.id.clone()]);
    assert_eq!(item.tags, vec![lamp.id.clone()]);
    store.create(item).unwrap();
    store
        .create(Item::new("Desk", "", 1.0, "u1").with_tags([desk.id.clone()]))
        .unwrap();

    let analytics = store.refresh_analytics().unwrap();
    let counts: Vec<_> = analytics
        .popular_tags
        .iter()
        .map(|e| (e.name.as_str(), e.count))
        .collect();
    assert_eq!(counts.len(), 2);
    assert!(counts.iter().all(|(_, count)| *count == 1));
}

// =============================================================================
// Recent activity
// =============================================================================

#[test]
fn test_recent_activities_are_capped_and_named() {
    let store = RecordStore::in_memory().unwrap();
    let alice = User::new("alice", "digest", "alice@example.com", Role::User);
    store.create(alice.clone()).unwrap();

    for i in 0..12 {
        store
            .create(AuditLog::new(
                AuditAction::Create,
                EntityKind::Item,
                format!("i{}", i),
                &alice.id,
                "",
            ))
            .unwrap();
    }
    store
        .create(AuditLog::new(AuditAction::Delete, EntityKind::Tag, "t1", "gone", ""))
        .unwrap();

    let analytics = store.refresh_analytics().unwrap();
    assert_eq!(analytics.recent_activities.len(), 10);
    assert!(analytics
        .recent_activities
        .iter()
        .any(|line| line.starts_with("alice create item")));
    assert!(analytics
        .recent_activities
        .iter()
        .any(|line| line == "Unknown delete tag t1"));
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_refresh_is_persisted() {
    let snapshot = Arc::new(MemorySnapshot::new());
    let store = RecordStore::open(snapshot.clone(), CorruptSnapshotPolicy::Fail).unwrap();
    let c = add_category(&store, "C");
    add_items(&store, &c, 2);

    let saves = snapshot.save_count();
    let analytics = store.refresh_analytics().unwrap();
    assert_eq!(snapshot.save_count(), saves + 1);

    let bytes = snapshot.contents().unwrap();
    let state = StoreState::from_json(&bytes).unwrap();
    assert_eq!(state.analytics, analytics);
}
