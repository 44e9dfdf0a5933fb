//! SQL-like select over arrays of records.

use crate::accessor::{property, Accessor, Specs};
use crate::aggregate::Aggregate;
use crate::combinators::and;
use crate::error::QueryError;
use crate::group::{group_by, GroupBy};
use crate::sort::{multisort, sort_rows, MultiSort};
use serde_json::{Map, Value};
use sift_expr::JsValue;

/// The alias that makes a select keep every field of the input row.
pub const SPLAT: &str = "*";

/// A projected column: a per-record accessor or an aggregate.
#[derive(Debug, Clone)]
pub enum Column {
    Plain(Accessor),
    Aggregate(Aggregate),
}

impl Column {
    pub fn name(&self) -> &str {
        match self {
            Column::Plain(a) => a.name(),
            Column::Aggregate(a) => a.name(),
        }
    }
}

impl From<&str> for Column {
    fn from(s: &str) -> Self {
        Column::Plain(property(s))
    }
}

impl From<String> for Column {
    fn from(s: String) -> Self {
        Column::Plain(property(s))
    }
}

impl From<Accessor> for Column {
    fn from(a: Accessor) -> Self {
        Column::Plain(a)
    }
}

impl From<Aggregate> for Column {
    fn from(a: Aggregate) -> Self {
        Column::Aggregate(a)
    }
}

/// A query built with chained setters and run with [`Select::from`].
#[derive(Debug, Clone)]
pub struct Select {
    columns: Vec<Accessor>,
    aggregates: Vec<Aggregate>,
    splat: bool,
    filter: Option<Accessor>,
    group_by: Option<GroupBy>,
    having: Option<Accessor>,
    sort: Option<MultiSort>,
    limit: usize,
    offset: usize,
}

/// Starts a select over `columns`.
///
/// Text columns read the field of that name. A column named `"*"` keeps all
/// input fields; without any plain columns rows pass through unchanged.
///
/// ```
/// use serde_json::json;
/// use sift_query::{max, select, Column};
///
/// let rows = [
///     json!({"foo": 1, "bar": 2}),
///     json!({"foo": 1, "bar": 6}),
///     json!({"foo": 2, "bar": 3}),
/// ];
/// let out = select([Column::from("foo"), max("bar").alias("max_bar").into()])
///     .group_by("foo")
///     .unwrap()
///     .from(&rows)
///     .unwrap();
/// assert_eq!(out, vec![json!({"foo": 1, "max_bar": 6}), json!({"foo": 2, "max_bar": 3})]);
/// ```
pub fn select<I, C>(columns: I) -> Select
where
    I: IntoIterator<Item = C>,
    C: Into<Column>,
{
    let mut plain = Vec::new();
    let mut aggregates = Vec::new();
    for column in columns {
        match column.into() {
            Column::Plain(a) => plain.push(a),
            Column::Aggregate(a) => aggregates.push(a),
        }
    }
    let mut splat = true;
    if !plain.is_empty() {
        let before = plain.len();
        plain.retain(|a| a.name() != SPLAT);
        splat = plain.len() != before;
    }
    Select {
        columns: plain,
        aggregates,
        splat,
        filter: None,
        group_by: None,
        having: None,
        sort: None,
        limit: 0,
        offset: 0,
    }
}

impl Select {
    /// Keeps projected rows matching every predicate.
    pub fn where_(mut self, specs: impl Into<Specs>) -> Result<Self, QueryError> {
        self.filter = Some(and(specs)?);
        Ok(self)
    }

    pub fn order_by(mut self, specs: impl Into<Specs>) -> Result<Self, QueryError> {
        self.sort = Some(multisort(specs)?);
        Ok(self)
    }

    pub fn group_by(mut self, specs: impl Into<Specs>) -> Result<Self, QueryError> {
        self.group_by = Some(group_by(specs)?);
        Ok(self)
    }

    /// Keeps grouped records matching every predicate.
    pub fn having(mut self, specs: impl Into<Specs>) -> Result<Self, QueryError> {
        self.having = Some(and(specs)?);
        Ok(self)
    }

    /// Caps the output length. `0` means no cap.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit_offset(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Skips the first `offset` output records.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit_value(&self) -> usize {
        self.limit
    }

    pub fn offset_value(&self) -> usize {
        self.offset
    }

    pub fn is_splat(&self) -> bool {
        self.splat
    }

    fn project(&self, row: &Value) -> Result<JsValue, QueryError> {
        if self.columns.is_empty() {
            return Ok(JsValue::Json(row.clone()));
        }
        let mut out = Map::new();
        if self.splat {
            if let Value::Object(fields) = row {
                sift_util::extend(&mut out, [fields]);
            }
        }
        let d = JsValue::Json(row.clone());
        for column in &self.columns {
            out.insert(column.name().to_string(), column.call(&d)?.into_json());
        }
        Ok(JsValue::Json(Value::Object(out)))
    }

    fn aggregate(
        &self,
        mut record: Map<String, Value>,
        members: &[JsValue],
    ) -> Result<JsValue, QueryError> {
        for agg in &self.aggregates {
            record.insert(agg.name().to_string(), agg.apply(members)?.into_json());
        }
        Ok(JsValue::Json(Value::Object(record)))
    }

    /// Runs the query. `rows` is only read.
    pub fn from(&self, rows: &[Value]) -> Result<Vec<Value>, QueryError> {
        let input: Vec<JsValue> = rows.iter().cloned().map(JsValue::Json).collect();

        let mut projected: Vec<JsValue> = Vec::with_capacity(rows.len());
        let mut origin: Vec<usize> = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let d = self.project(row)?;
            if let Some(filter) = &self.filter {
                if !filter.test(&d)? {
                    continue;
                }
            }
            projected.push(d);
            origin.push(i);
        }
        let filtered = projected.len();

        let mut group_count = None;
        let mut out = if let Some(group_by) = &self.group_by {
            let groups = group_by.group(&projected)?;
            group_count = Some(groups.len());
            let mut records = Vec::with_capacity(groups.len());
            for entry in groups {
                let members: Vec<JsValue> = entry
                    .members()
                    .iter()
                    .map(|&m| input[origin[m]].clone())
                    .collect();
                records.push(self.aggregate(entry.into_record(), &members)?);
            }
            records
        } else if !self.aggregates.is_empty() {
            // One implicit group holding every row that passed the filter.
            let members: Vec<JsValue> = origin.iter().map(|&i| input[i].clone()).collect();
            group_count = Some(1);
            vec![self.aggregate(Map::new(), &members)?]
        } else {
            projected
        };

        if group_count.is_some() {
            if let Some(having) = &self.having {
                let mut kept = Vec::with_capacity(out.len());
                for record in out {
                    if having.test(&record)? {
                        kept.push(record);
                    }
                }
                out = kept;
            }
        }

        if let Some(sort) = &self.sort {
            sort_rows(&mut out, sort)?;
        }

        let take = if self.limit > 0 { self.limit } else { usize::MAX };
        let result: Vec<Value> = out
            .into_iter()
            .skip(self.offset)
            .take(take)
            .map(JsValue::into_json)
            .collect();

        tracing::debug!(
            target: "sift_query::select",
            input = rows.len(),
            filtered,
            groups = ?group_count,
            output = result.len(),
            "select executed"
        );
        Ok(result)
    }
}
