//! Aggregate statistics over the catalog
//!
//! Computed on explicit refresh only. Reading the cached snapshot never
//! recomputes it.

mod aggregator;

pub use aggregator::{
    newest_first, AnalyticsAggregator, POPULAR_LIMIT, RECENT_LIMIT, UNKNOWN_ACTOR,
};
