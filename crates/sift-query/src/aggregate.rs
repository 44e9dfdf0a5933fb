//! Aggregate columns: reductions over a group of records.

use crate::accessor::{property, Accessor, Spec};
use sift_expr::{ExprError, JsValue};
use std::fmt;
use std::sync::Arc;

/// A reduction over a sequence of values.
pub type ReduceFn = dyn Fn(&[JsValue]) -> JsValue + Send + Sync;

/// Bare reductions.
pub mod reduce {
    use crate::is;
    use sift_expr::util::{js_gt, js_lt, num_to_jsval, to_number, usize_to_jsval};
    use sift_expr::JsValue;

    pub fn count(values: &[JsValue]) -> JsValue {
        usize_to_jsval(values.len())
    }

    /// Adds the numbers, skipping everything else. Empty input sums to `0`.
    pub fn sum(values: &[JsValue]) -> JsValue {
        let total: f64 = values
            .iter()
            .filter(|v| is::number(v))
            .map(to_number)
            .sum();
        num_to_jsval(total)
    }

    fn pick(values: &[JsValue], replaces: fn(&JsValue, &JsValue) -> bool) -> JsValue {
        let Some((first, rest)) = values.split_first() else {
            return JsValue::Undefined;
        };
        let mut best = first;
        for v in rest {
            if replaces(v, best) {
                best = v;
            }
        }
        best.clone()
    }

    /// The least value under relational comparison, or `undefined` if empty.
    pub fn min(values: &[JsValue]) -> JsValue {
        pick(values, js_lt)
    }

    /// The greatest value under relational comparison, or `undefined` if empty.
    pub fn max(values: &[JsValue]) -> JsValue {
        pick(values, js_gt)
    }
}

/// A column computed from all records of a group.
#[derive(Clone)]
pub struct Aggregate {
    label: String,
    alias: Option<String>,
    inner: Option<Accessor>,
    reduce: Arc<ReduceFn>,
}

impl Aggregate {
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    /// The alias, or `"reduction(inner)"` without one.
    pub fn name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.label)
    }

    pub fn inner(&self) -> Option<&Accessor> {
        self.inner.as_ref()
    }

    /// Maps `rows` through the inner accessor, if any, and reduces.
    pub fn apply(&self, rows: &[JsValue]) -> Result<JsValue, ExprError> {
        match &self.inner {
            Some(inner) => {
                let values = rows
                    .iter()
                    .map(|row| inner.call(row))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((self.reduce)(&values))
            }
            None => Ok((self.reduce)(rows)),
        }
    }
}

impl fmt::Debug for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Aggregate").field(&self.name()).finish()
    }
}

/// Builds [`Aggregate`]s sharing one reduction.
#[derive(Clone)]
pub struct AggregateFactory {
    name: Arc<str>,
    reduce: Arc<ReduceFn>,
}

impl AggregateFactory {
    /// An aggregate over `spec` read from each record.
    pub fn of(&self, spec: impl Into<Spec>) -> Aggregate {
        let inner = property(spec);
        Aggregate {
            label: format!("{}({})", self.name, inner.name()),
            alias: None,
            inner: Some(inner),
            reduce: Arc::clone(&self.reduce),
        }
    }

    /// An aggregate over the records themselves.
    pub fn rows(&self) -> Aggregate {
        Aggregate {
            label: format!("{}()", self.name),
            alias: None,
            inner: None,
            reduce: Arc::clone(&self.reduce),
        }
    }
}

impl fmt::Debug for AggregateFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AggregateFactory").field(&self.name).finish()
    }
}

/// Wraps a named reduction into an aggregate factory.
///
/// ```
/// use serde_json::json;
/// use sift_expr::JsValue;
/// use sift_query::aggregate::{agg, reduce};
///
/// let total = agg("sum", reduce::sum).of("n");
/// assert_eq!(total.name(), "sum(n)");
/// let rows: Vec<JsValue> = vec![json!({"n": 2}).into(), json!({"n": 3}).into()];
/// assert_eq!(total.apply(&rows).unwrap(), JsValue::from(5i64));
/// ```
pub fn agg<F>(name: impl Into<String>, reduce: F) -> AggregateFactory
where
    F: Fn(&[JsValue]) -> JsValue + Send + Sync + 'static,
{
    AggregateFactory {
        name: Arc::from(name.into()),
        reduce: Arc::new(reduce),
    }
}

/// Number of records in the group.
pub fn count() -> Aggregate {
    agg("count", reduce::count).rows()
}

pub fn count_of(spec: impl Into<Spec>) -> Aggregate {
    agg("count", reduce::count).of(spec)
}

pub fn sum(spec: impl Into<Spec>) -> Aggregate {
    agg("sum", reduce::sum).of(spec)
}

pub fn min(spec: impl Into<Spec>) -> Aggregate {
    agg("min", reduce::min).of(spec)
}

pub fn max(spec: impl Into<Spec>) -> Aggregate {
    agg("max", reduce::max).of(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(v: serde_json::Value) -> Vec<JsValue> {
        match v {
            serde_json::Value::Array(items) => items.into_iter().map(JsValue::Json).collect(),
            other => vec![JsValue::Json(other)],
        }
    }

    #[test]
    fn min_max_keep_first_on_ties() {
        let vs = values(json!([3, 1, "1", 5, 5.0]));
        assert_eq!(reduce::min(&vs), JsValue::from(1i64));
        assert_eq!(reduce::max(&vs), JsValue::from(5i64));
    }

    #[test]
    fn labels() {
        assert_eq!(count().name(), "count()");
        assert_eq!(max("bar").name(), "max(bar)");
        assert_eq!(max("bar").alias("max_bar").name(), "max_bar");
    }

    #[test]
    fn inner_accessor_maps_first() {
        let rows = values(json!([{"bar": 2}, {"bar": 7}, {}]));
        assert_eq!(max("bar").apply(&rows).unwrap(), JsValue::from(7i64));
        assert_eq!(count().apply(&rows).unwrap(), JsValue::from(3i64));
        assert_eq!(sum("bar").apply(&rows).unwrap(), JsValue::from(9i64));
    }
}
