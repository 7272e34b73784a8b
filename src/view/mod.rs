//! List screen model: filter criteria, sort state, column layout and the
//! memoized view that combines them.

pub mod columns;
pub mod engine;
pub mod filter;
pub mod sort;

pub use columns::{ColumnDefinition, ColumnPreference, ColumnSet};
pub use engine::ListView;
pub use filter::{FilterChip, FilterCriteria, FilterKind};
pub use sort::{SortIndicator, SortState};
