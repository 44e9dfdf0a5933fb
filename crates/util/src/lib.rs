//! sift-util - JSON value helpers shared by the sift crates.
//!
//! Everything here works on plain `serde_json::Value`s: structural equality,
//! list flattening, record helpers and a stable sort that tolerates
//! inconsistent comparators.

pub mod flatten;
pub mod is_empty;
pub mod json_equal;
pub mod record;
pub mod sort;

// Re-exports for convenience
pub use flatten::{flatten, flatten_into};
pub use is_empty::{is_empty_map, is_empty_value};
pub use json_equal::{deep_equal, number_eq};
pub use record::{delist, enlist, extend, values};
pub use sort::{insertion_sort_by, stable_sort_by, try_stable_sort_by};
