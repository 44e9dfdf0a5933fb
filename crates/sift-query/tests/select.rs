use serde_json::{json, Value};
use sift_expr::JsValue;
use sift_query::aggregate::{agg, reduce};
use sift_query::{
    count, expr, group_by, max, min, property, select, sort, sum, Column, QueryError, SortOrder,
};

fn foo_bar_rows() -> Vec<Value> {
    vec![
        json!({"foo": 0, "bar": 0}),
        json!({"foo": 1, "bar": 0}),
        json!({"foo": 2, "bar": 1}),
        json!({"foo": 1, "bar": 2}),
    ]
}

fn js(values: Value) -> Vec<JsValue> {
    match values {
        Value::Array(items) => items.into_iter().map(JsValue::Json).collect(),
        other => vec![JsValue::Json(other)],
    }
}

#[test]
fn test_select_projects_named_columns_only() {
    let out = select(["foo"]).from(&foo_bar_rows()).unwrap();
    assert_eq!(out.len(), 4);
    let first = out[0].as_object().unwrap();
    assert_eq!(first.len(), 1);
    assert!(first.contains_key("foo"));
}

#[test]
fn test_select_group_aggregate_order() {
    let out = select([Column::from("foo"), max("bar").alias("max_bar").into()])
        .group_by("foo")
        .unwrap()
        .order_by(["max_bar desc", "foo desc"])
        .unwrap()
        .from(&foo_bar_rows())
        .unwrap();
    assert_eq!(
        out,
        vec![
            json!({"max_bar": 2, "foo": 1}),
            json!({"max_bar": 1, "foo": 2}),
            json!({"max_bar": 0, "foo": 0}),
        ]
    );
}

#[test]
fn test_sum_min_max_reductions() {
    assert_eq!(reduce::sum(&[]), JsValue::from(0i64));
    assert_eq!(reduce::sum(&js(json!([1, "x", 2]))), JsValue::from(3i64));
    assert_eq!(reduce::min(&[]), JsValue::Undefined);
    assert_eq!(reduce::max(&[]), JsValue::Undefined);
}

#[test]
fn test_group_by_first_seen_order() {
    let rows = [json!({"foo": 1}), json!({"foo": 2}), json!({"foo": 1})];
    let groups = group_by("foo").unwrap().group_values(&rows).unwrap();
    let keys: Vec<&Value> = groups.iter().map(|g| &g.fields()["foo"]).collect();
    assert_eq!(keys, [&json!(1), &json!(2)]);
    assert_eq!(groups[0].members(), &[0, 2]);
    assert_eq!(groups[1].members(), &[1]);
}

#[test]
fn test_group_record_has_no_member_buffer() {
    let rows = [json!({"foo": 1}), json!({"foo": 1})];
    let groups = group_by("foo").unwrap().group_values(&rows).unwrap();
    let record = groups.into_iter().next().unwrap().into_record();
    assert_eq!(Value::Object(record), json!({"foo": 1}));
}

#[test]
fn test_where_filters_projected_rows() {
    let rows = [
        json!({"a": "hi", "b": "beep", "c": 2}),
        json!({"a": "ho", "b": "boop", "c": 0}),
        json!({"a": "yo", "b": "bleep", "c": 3}),
    ];
    let out = select(Vec::<&str>::new())
        .where_("c > 1")
        .unwrap()
        .from(&rows)
        .unwrap();
    assert_eq!(out, vec![rows[0].clone(), rows[2].clone()]);

    // Columns not in the projection are gone by the time `where` runs.
    let out = select(["a"]).where_("c > 1").unwrap().from(&rows).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_expression_columns() {
    let rows = [json!({"a": "hi", "b": "beep"})];
    let cols: Vec<Column> = vec![
        "a".into(),
        expr("b.length").unwrap().into(),
        expr("a + b").unwrap().alias("ab").into(),
    ];
    let out = select(cols).from(&rows).unwrap();
    assert_eq!(out, vec![json!({"a": "hi", "b.length": 4, "ab": "hibeep"})]);
}

#[test]
fn test_later_column_wins_on_alias() {
    let rows = [json!({"a": 1, "b": 2})];
    let cols: Vec<Column> = vec![
        property("a").alias("x").into(),
        property("b").alias("x").into(),
    ];
    let out = select(cols).from(&rows).unwrap();
    assert_eq!(out, vec![json!({"x": 2})]);
}

#[test]
fn test_splat_with_named_column() {
    let rows = [json!({"a": 1, "b": 2})];
    let cols: Vec<Column> = vec!["*".into(), expr("a + b").unwrap().alias("c").into()];
    let out = select(cols).from(&rows).unwrap();
    assert_eq!(out, vec![json!({"a": 1, "b": 2, "c": 3})]);
}

#[test]
fn test_aggregates_run_over_original_rows() {
    let rows = [
        json!({"k": "a", "v": 1}),
        json!({"k": "a", "v": 5}),
        json!({"k": "b", "v": 2}),
    ];
    // `v` is not projected, yet the aggregate still sees it.
    let out = select([Column::from("k"), sum("v").into(), count().into()])
        .group_by("k")
        .unwrap()
        .from(&rows)
        .unwrap();
    assert_eq!(
        out,
        vec![
            json!({"k": "a", "sum(v)": 6, "count()": 2}),
            json!({"k": "b", "sum(v)": 2, "count()": 1}),
        ]
    );
}

#[test]
fn test_having() {
    let rows = [
        json!({"k": "a", "v": 1}),
        json!({"k": "a", "v": 5}),
        json!({"k": "b", "v": 2}),
    ];
    let out = select([Column::from("k"), count().alias("n").into()])
        .group_by("k")
        .unwrap()
        .having("n > 1")
        .unwrap()
        .from(&rows)
        .unwrap();
    assert_eq!(out, vec![json!({"k": "a", "n": 2})]);
}

#[test]
fn test_aggregates_without_group_by_form_one_group() {
    let rows = [json!({"v": 4}), json!({"v": 9}), json!({"v": 1})];
    let cols: Vec<Column> = vec![min("v").into(), max("v").into(), count().into()];
    let out = select(cols).where_("v > 1").unwrap().from(&rows).unwrap();
    assert_eq!(out, vec![json!({"min(v)": 4, "max(v)": 9, "count()": 2})]);

    // Empty input still yields the single aggregate record.
    let cols: Vec<Column> = vec![sum("v").into(), max("v").into()];
    let out = select(cols).from(&[]).unwrap();
    assert_eq!(out, vec![json!({"sum(v)": 0, "max(v)": null})]);
}

#[test]
fn test_having_filters_the_implicit_group() {
    let rows = [json!({"v": 1}), json!({"v": 2}), json!({"v": 3})];
    let cols = || vec![Column::from(count().alias("n")), sum("v").alias("total").into()];

    let out = select(cols()).having("n > 5").unwrap().from(&rows).unwrap();
    assert!(out.is_empty());

    let out = select(cols()).having("n > 2").unwrap().from(&rows).unwrap();
    assert_eq!(out, vec![json!({"n": 3, "total": 6})]);
}

#[test]
fn test_index_sort_order_is_ascending() {
    let a = json!({"a": 1}).into();
    let b = json!({"a": 2}).into();
    for order in [SortOrder::Index(3), SortOrder::from(0i64), SortOrder::from(-1i64)] {
        let by_a = sort("a", order).unwrap();
        assert_eq!(by_a.compare(&a, &b).unwrap(), -1.0);
        assert_eq!(by_a.compare(&b, &a).unwrap(), 1.0);
    }
}

#[test]
fn test_limit_offset() {
    let rows: Vec<Value> = (0..10).map(|i| json!({"i": i})).collect();
    let out = select(["i"])
        .order_by("i desc")
        .unwrap()
        .limit_offset(3, 2)
        .from(&rows)
        .unwrap();
    assert_eq!(out, vec![json!({"i": 7}), json!({"i": 6}), json!({"i": 5})]);

    let out = select(["i"]).offset(8).from(&rows).unwrap();
    assert_eq!(out, vec![json!({"i": 8}), json!({"i": 9})]);

    let out = select(["i"]).offset(20).from(&rows).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_sort_is_stable() {
    let rows = [
        json!({"k": 2, "id": "a"}),
        json!({"k": 1, "id": "b"}),
        json!({"k": 2, "id": "c"}),
        json!({"k": null, "id": "d"}),
        json!({"k": 1, "id": "e"}),
    ];
    let out = select(Vec::<&str>::new())
        .order_by("k")
        .unwrap()
        .from(&rows)
        .unwrap();
    let ids: Vec<&str> = out.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["d", "b", "e", "a", "c"]);
}

#[test]
fn test_sort_tolerates_mixed_types() {
    let rows = [
        json!({"k": 2}),
        json!({"k": "x"}),
        json!({"k": [1]}),
        json!({"k": 1}),
        json!({}),
        json!({"k": "a"}),
    ];
    let out = select(Vec::<&str>::new())
        .order_by(["k", "k desc"])
        .unwrap()
        .from(&rows)
        .unwrap();
    assert_eq!(out.len(), rows.len());
    for row in &rows {
        assert!(out.contains(row));
    }
}

#[test]
fn test_input_not_mutated() {
    let rows = foo_bar_rows();
    let before = rows.clone();
    let _ = select([Column::from("foo"), count().into()])
        .group_by("foo")
        .unwrap()
        .from(&rows)
        .unwrap();
    assert_eq!(rows, before);
}

#[test]
fn test_errors() {
    // Only a trailing "asc"/"desc" is read as an order.
    assert!(select(["a"]).order_by("a sideways").is_ok());
    let err = sort("a", "sideways").unwrap_err();
    assert_eq!(err.to_string(), "unrecognized sort order: 'sideways'");

    let err = select(["a"]).group_by(Vec::<&str>::new()).unwrap_err();
    assert_eq!(
        err,
        QueryError::InvalidGroupBy("groupBy expects at least one expression".to_string())
    );

    assert!(matches!(
        select(["a"]).where_("a >"),
        Err(QueryError::Expr(_))
    ));
}

#[test]
fn test_custom_aggregate() {
    let distinct = agg("distinct", |values: &[JsValue]| {
        let mut seen: Vec<String> = Vec::new();
        for v in values {
            let s = v.to_string();
            if !seen.contains(&s) {
                seen.push(s);
            }
        }
        JsValue::from(seen.len() as i64)
    });
    let rows = [json!({"t": "x"}), json!({"t": "y"}), json!({"t": "x"})];
    let col = distinct.of("t");
    assert_eq!(col.name(), "distinct(t)");
    let out = select(vec![Column::from(col)]).from(&rows).unwrap();
    assert_eq!(out, vec![json!({"distinct(t)": 2})]);
}
