//! Sorting utilities.
//!
//! Provides an insertion sort for small slices and a stable merge sort built
//! on top of it. Neither relies on the comparator being a total order, so
//! comparators over mixed-type values (where `a < b` and `b < a` may both be
//! false without `a == b`) produce some permutation instead of panicking.

mod insertion;
mod merge;

pub use insertion::{insertion_sort_by, try_insertion_sort_by};
pub use merge::{stable_sort_by, try_stable_sort_by};
