//! Analytics computation
//!
//! Pure function of the store state: the caller holds whatever lock it
//! needs and decides where the result goes.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::model::{Analytics, AuditLog, PopularEntry};
use crate::storage::StoreState;

/// Entries kept in each popularity ranking
pub const POPULAR_LIMIT: usize = 5;

/// Activity lines kept in the recent-activity list
pub const RECENT_LIMIT: usize = 10;

/// Display name for audit entries whose actor no longer exists
pub const UNKNOWN_ACTOR: &str = "Unknown";

/// Derives an [`Analytics`] snapshot from store state
pub struct AnalyticsAggregator;

impl AnalyticsAggregator {
    /// Computes fresh analytics stamped at `now`
    pub fn compute(state: &StoreState, now: DateTime<Utc>) -> Analytics {
        Analytics {
            total_users: state.users.len(),
            total_items: state.items.len(),
            total_categories: state.categories.len(),
            total_tags: state.tags.len(),
            popular_categories: Self::popular_categories(state, POPULAR_LIMIT),
            popular_tags: Self::popular_tags(state, POPULAR_LIMIT),
            recent_activities: Self::recent_activities(state, RECENT_LIMIT),
            updated_at: now,
        }
    }

    /// Categories ranked by how many items reference them
    pub fn popular_categories(state: &StoreState, limit: usize) -> Vec<PopularEntry> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for item in state.items.values() {
            *counts.entry(item.category_id.as_str()).or_insert(0) += 1;
        }

        let entries = counts.into_iter().filter_map(|(id, count)| {
            state.categories.get(id).map(|category| PopularEntry {
                id: category.id.clone(),
                name: category.name.clone(),
                count,
            })
        });
        Self::rank(entries, limit)
    }

    /// Tags ranked by how many items carry them
    pub fn popular_tags(state: &StoreState, limit: usize) -> Vec<PopularEntry> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for item in state.items.values() {
            // An item counts once per tag, however often it lists it
            let distinct: HashSet<&str> = item.tags.iter().map(String::as_str).collect();
            for tag_id in distinct {
                *counts.entry(tag_id).or_insert(0) += 1;
            }
        }

        let entries = counts.into_iter().filter_map(|(id, count)| {
            state.tags.get(id).map(|tag| PopularEntry {
                id: tag.id.clone(),
                name: tag.name.clone(),
                count,
            })
        });
        Self::rank(entries, limit)
    }

    /// The most recent audit entries rendered as activity lines
    pub fn recent_activities(state: &StoreState, limit: usize) -> Vec<String> {
        let mut logs: Vec<&AuditLog> = state.audit_logs.values().collect();
        logs.sort_by(|a, b| newest_first(a, b));

        logs.into_iter()
            .take(limit)
            .map(|log| {
                let actor = state
                    .users
                    .get(&log.user_id)
                    .map(|user| user.username.as_str())
                    .unwrap_or(UNKNOWN_ACTOR);
                log.describe(actor)
            })
            .collect()
    }

    // Count descending, then id ascending. Zero counts never reach here
    // because only referenced ids are counted.
    fn rank(entries: impl Iterator<Item = PopularEntry>, limit: usize) -> Vec<PopularEntry> {
        let mut ranked: Vec<PopularEntry> = entries.collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.id.cmp(&b.id)));
        ranked.truncate(limit);
        ranked
    }
}

/// Ordering for audit entries: timestamp descending, then id ascending
pub fn newest_first(a: &AuditLog, b: &AuditLog) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuditAction, Category, EntityKind, Item, Role, Tag, User};
    use chrono::Duration;

    fn insert_item(state: &mut StoreState, item: Item) {
        state.items.insert(item.id.clone(), item);
    }

    #[test]
    fn test_counts() {
        let mut state = StoreState::new();
        let user = User::new("alice", "d", "a@example.com", Role::User);
        state.users.insert(user.id.clone(), user);
        insert_item(&mut state, Item::new("Lamp", "", 1.0, "u1"));

        let analytics = AnalyticsAggregator::compute(&state, Utc::now());
        assert_eq!(analytics.total_users, 1);
        assert_eq!(analytics.total_items, 1);
        assert_eq!(analytics.total_categories, 0);
        assert_eq!(analytics.total_tags, 0);
    }

    #[test]
    fn test_popular_categories_rank_and_exclusions() {
        let mut state = StoreState::new();
        let mut a = Category::new("A", "", "u1");
        a.id = "cat-a".into();
        let mut b = Category::new("B", "", "u1");
        b.id = "cat-b".into();
        let mut unused = Category::new("Unused", "", "u1");
        unused.id = "cat-unused".into();
        for c in [&a, &b, &unused] {
            state.categories.insert(c.id.clone(), c.clone());
        }

        insert_item(&mut state, Item::new("1", "", 1.0, "u1").with_category("cat-b"));
        insert_item(&mut state, Item::new("2", "", 1.0, "u1").with_category("cat-a"));
        insert_item(&mut state, Item::new("3", "", 1.0, "u1").with_category("cat-b"));
        insert_item(&mut state, Item::new("4", "", 1.0, "u1").with_category("gone"));
        insert_item(&mut state, Item::new("5", "", 1.0, "u1"));

        let popular = AnalyticsAggregator::popular_categories(&state, POPULAR_LIMIT);
        assert_eq!(
            popular,
            vec![
                PopularEntry { id: "cat-b".into(), name: "B".into(), count: 2 },
                PopularEntry { id: "cat-a".into(), name: "A".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_ties_break_by_id_and_limit_applies() {
        let mut state = StoreState::new();
        let mut tag_ids = Vec::new();
        for n in 0..7 {
            let mut tag = Tag::new(format!("tag{}", n), "u1");
            tag.id = format!("t{}", n);
            tag_ids.push(tag.id.clone());
            state.tags.insert(tag.id.clone(), tag);
        }
        insert_item(
            &mut state,
            Item::new("all", "", 1.0, "u1").with_tags(tag_ids.iter().rev().cloned()),
        );

        let popular = AnalyticsAggregator::popular_tags(&state, POPULAR_LIMIT);
        let ids: Vec<_> = popular.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["t0", "t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn test_item_listing_a_tag_twice_counts_once() {
        let mut state = StoreState::new();
        let mut tag = Tag::new("lamp", "u1");
        tag.id = "t1".into();
        state.tags.insert(tag.id.clone(), tag);

        // Older snapshots may carry repeated ids
        let mut item = Item::new("Lamp", "", 1.0, "u1");
        item.tags = vec!["t1".into(), "t1".into(), "t1".into()];
        insert_item(&mut state, item);

        let popular = AnalyticsAggregator::popular_tags(&state, POPULAR_LIMIT);
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].count, 1);
    }

    #[test]
    fn test_recent_activities_newest_first_with_unknown_actor() {
        let mut state = StoreState::new();
        let user = User::new("alice", "d", "a@example.com", Role::User);
        state.users.insert(user.id.clone(), user.clone());

        let base = Utc::now();
        for n in 0..12 {
            let mut log = AuditLog::new(
                AuditAction::Create,
                EntityKind::Item,
                format!("item{}", n),
                if n == 11 { "ghost" } else { user.id.as_str() },
                "",
            );
            log.timestamp = base + Duration::seconds(n);
            state.audit_logs.insert(log.id.clone(), log);
        }

        let recent = AnalyticsAggregator::recent_activities(&state, RECENT_LIMIT);
        assert_eq!(recent.len(), RECENT_LIMIT);
        assert_eq!(recent[0], "Unknown create item item11");
        assert_eq!(recent[1], "alice create item item10");
        assert_eq!(recent[9], "alice create item item2");
    }
}
