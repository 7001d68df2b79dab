//! Query engine
//!
//! Turns a raw collection listing into a filtered, sorted, paginated page,
//! and runs case-insensitive substring search. Operates on snapshots taken
//! by the record store under its read lock; holds no state of its own.

mod executor;
mod fields;
mod filters;
mod pagination;
mod search;
mod sorter;

pub use executor::QueryExecutor;
pub use filters::{FieldFilter, Filter, Queryable};
pub use pagination::{Page, PageRequest, PageWindow, DEFAULT_PER_PAGE};
pub use search::{contains_insensitive, SubstringSearch};
pub use sorter::{RecordSorter, SortDirection, SortSpec};
