//! JSON equality utilities.
//!
//! Structural equality where numbers compare by numeric value, so `1` and
//! `1.0` are the same number.

mod deep_equal;

pub use deep_equal::{deep_equal, number_eq};
