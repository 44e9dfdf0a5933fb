//! Comparators for ordering records.

use crate::accessor::{property, Accessor, Spec, Specs};
use crate::error::QueryError;
use regex::Regex;
use sift_expr::util::{compare, to_number};
use sift_expr::{ExprError, JsValue};
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// `1` if `a > b`, `-1` if `a < b`, else `0`.
pub fn asc(a: &JsValue, b: &JsValue) -> i32 {
    match compare(a, b) {
        Some(Ordering::Greater) => 1,
        Some(Ordering::Less) => -1,
        _ => 0,
    }
}

/// The negation of [`asc`].
pub fn desc(a: &JsValue, b: &JsValue) -> i32 {
    -asc(a, b)
}

/// `a - b` on numeric conversions.
pub fn asc_numeric(a: &JsValue, b: &JsValue) -> f64 {
    to_number(a) - to_number(b)
}

/// `b - a` on numeric conversions.
pub fn desc_numeric(a: &JsValue, b: &JsValue) -> f64 {
    to_number(b) - to_number(a)
}

/// A user comparator. Negative, zero and positive results order as usual.
pub type CompareFn = dyn Fn(&JsValue, &JsValue) -> f64 + Send + Sync;

#[derive(Clone)]
pub enum Order {
    Asc,
    Desc,
    AscNumeric,
    DescNumeric,
    Custom(Arc<CompareFn>),
}

impl Order {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&JsValue, &JsValue) -> f64 + Send + Sync + 'static,
    {
        Order::Custom(Arc::new(f))
    }

    pub fn apply(&self, a: &JsValue, b: &JsValue) -> f64 {
        match self {
            Order::Asc => asc(a, b) as f64,
            Order::Desc => desc(a, b) as f64,
            Order::AscNumeric => asc_numeric(a, b),
            Order::DescNumeric => desc_numeric(a, b),
            Order::Custom(f) => f(a, b),
        }
    }

    /// Parses `asc` or `desc`, case-insensitively.
    pub fn from_name(name: &str) -> Result<Order, QueryError> {
        match name.to_ascii_lowercase().as_str() {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            _ => Err(QueryError::InvalidSortOrder(name.to_string())),
        }
    }
}

impl fmt::Debug for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Asc => f.write_str("Asc"),
            Order::Desc => f.write_str("Desc"),
            Order::AscNumeric => f.write_str("AscNumeric"),
            Order::DescNumeric => f.write_str("DescNumeric"),
            Order::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// The order argument of [`sort`].
#[derive(Clone, Debug, Default)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Default,
    /// Any index; ascending.
    Index(i64),
    /// `"asc"` or `"desc"`.
    Name(String),
    Order(Order),
}

impl From<&str> for SortOrder {
    fn from(s: &str) -> Self {
        SortOrder::Name(s.to_string())
    }
}

impl From<Order> for SortOrder {
    fn from(o: Order) -> Self {
        SortOrder::Order(o)
    }
}

impl From<i64> for SortOrder {
    fn from(i: i64) -> Self {
        SortOrder::Index(i)
    }
}

/// Compares two records on one key.
#[derive(Clone, Debug)]
pub struct Comparator {
    value: Accessor,
    order: Order,
}

impl Comparator {
    pub fn new(value: Accessor, order: Order) -> Self {
        Comparator { value, order }
    }

    pub fn key(&self) -> &Accessor {
        &self.value
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn compare(&self, a: &JsValue, b: &JsValue) -> Result<f64, ExprError> {
        Ok(self.order.apply(&self.value.call(a)?, &self.value.call(b)?))
    }
}

fn suffix_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^(.*) (asc|desc)$").ok())
        .as_ref()
}

/// Builds a comparator on `spec`.
///
/// A text spec ending in `" asc"` or `" desc"` (any case) uses that suffix as
/// its order and ignores an explicit one. The key is read with
/// [`property`], so `"price desc"` compares the `price` field.
pub fn sort(spec: impl Into<Spec>, order: impl Into<SortOrder>) -> Result<Comparator, QueryError> {
    let mut spec = spec.into();
    let mut order = order.into();
    if let Spec::Text(text) = &spec {
        if let Some(caps) = suffix_pattern().and_then(|re| re.captures(text)) {
            let key = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let suffix = caps.get(2).map_or("", |m| m.as_str()).to_string();
            if matches!(order, SortOrder::Name(_) | SortOrder::Order(_)) {
                tracing::warn!(
                    target: "sift_query::sort",
                    spec = text.as_str(),
                    ignored = ?order,
                    "ignoring sort() order"
                );
            }
            order = SortOrder::Name(suffix);
            spec = Spec::Text(key);
        }
    }
    let order = match order {
        SortOrder::Default | SortOrder::Index(_) => Order::Asc,
        SortOrder::Name(name) => Order::from_name(&name)?,
        SortOrder::Order(o) => o,
    };
    Ok(Comparator::new(property(spec), order))
}

/// Chains comparators: the first nonzero result wins.
#[derive(Clone, Debug, Default)]
pub struct MultiSort {
    sorts: Vec<Comparator>,
}

impl MultiSort {
    pub fn new(sorts: Vec<Comparator>) -> Self {
        MultiSort { sorts }
    }

    pub fn comparators(&self) -> &[Comparator] {
        &self.sorts
    }

    pub fn compare(&self, a: &JsValue, b: &JsValue) -> Result<f64, ExprError> {
        for s in &self.sorts {
            let order = s.compare(a, b)?;
            if order < 0.0 || order > 0.0 {
                return Ok(order);
            }
        }
        Ok(0.0)
    }
}

/// Compiles each spec with [`sort`] and default order.
pub fn multisort(specs: impl Into<Specs>) -> Result<MultiSort, QueryError> {
    let sorts = specs
        .into()
        .into_iter()
        .map(|s| sort(s, SortOrder::Default))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MultiSort::new(sorts))
}

fn to_ordering(order: f64) -> Ordering {
    if order < 0.0 {
        Ordering::Less
    } else if order > 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Sorts records in place, stably. Inconsistent orders (mixed types) never
/// panic; on a key error the slice is left unchanged.
pub fn sort_rows(rows: &mut [JsValue], by: &MultiSort) -> Result<(), ExprError> {
    sift_util::try_stable_sort_by(rows, |a, b| by.compare(a, b).map(to_ordering))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn suffix_wins_over_explicit_order() {
        let c = sort("foo desc", "asc").unwrap();
        assert_eq!(c.key().name(), "foo");
        assert!(matches!(c.order(), Order::Desc));
        let c = sort("foo ASC", SortOrder::Default).unwrap();
        assert!(matches!(c.order(), Order::Asc));
    }

    #[test]
    fn unknown_order_name() {
        assert_eq!(
            sort("foo", "sideways").unwrap_err(),
            QueryError::InvalidSortOrder("sideways".to_string())
        );
    }

    #[test]
    fn numeric_orders() {
        let a = JsValue::Json(json!(2));
        let b = JsValue::Json(json!("10"));
        assert_eq!(asc_numeric(&a, &b), -8.0);
        assert_eq!(desc_numeric(&a, &b), 8.0);
        // `2 < "10"` compares numerically: mixed types are not both strings.
        assert_eq!(asc(&a, &b), -1);
    }
}
