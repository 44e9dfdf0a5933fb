//! In-memory queries over arrays of JSON records.
//!
//! # Overview
//!
//! Accessors wrap a field name or an expression (see [`sift_expr`]) into a
//! named function of one record. They combine into predicates
//! ([`and`], [`or`], [`not`]), comparators ([`sort`], [`multisort`]),
//! groupings ([`group_by`], [`nest`]) and aggregate columns ([`count`],
//! [`sum`], [`min`], [`max`]). [`select`] runs them as a pipeline:
//! project, filter, group and aggregate, having, sort, then offset and
//! limit.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sift_query::{max, select, Column};
//!
//! let rows = [
//!     json!({"foo": 0, "bar": 0}),
//!     json!({"foo": 1, "bar": 0}),
//!     json!({"foo": 2, "bar": 1}),
//!     json!({"foo": 1, "bar": 2}),
//! ];
//! let out = select([Column::from("foo"), max("bar").alias("max_bar").into()])
//!     .group_by("foo")?
//!     .order_by(["max_bar desc", "foo desc"])?
//!     .from(&rows)?;
//! assert_eq!(
//!     out,
//!     vec![
//!         json!({"foo": 1, "max_bar": 2}),
//!         json!({"foo": 2, "max_bar": 1}),
//!         json!({"foo": 0, "max_bar": 0}),
//!     ]
//! );
//! # Ok::<(), sift_query::QueryError>(())
//! ```

pub mod accessor;
pub mod aggregate;
pub mod cmp;
pub mod coerce;
pub mod combinators;
pub mod error;
pub mod group;
pub mod is;
pub mod select;
pub mod sort;

pub use accessor::{
    expr, expr_with, functor, identity, literal, noop, property, sanitize_key, Accessor,
    AccessorFn, ExprOptions, Spec, Specs,
};
pub use aggregate::{agg, count, count_of, max, min, sum, Aggregate, AggregateFactory};
pub use cmp::{cmp, like, re};
pub use combinators::{and, compose, iff, index_in, not, or};
pub use error::QueryError;
pub use group::{group_by, nest, GroupBy, GroupEntry, Nest};
pub use select::{select, Column, Select};
pub use sort::{
    asc, asc_numeric, desc, desc_numeric, multisort, sort, sort_rows, Comparator, MultiSort,
    Order, SortOrder,
};
