use serde_json::json;
use sift_expr::{EvalOptions, ExprError, JsValue};
use sift_query::{
    cmp, expr, expr_with, identity, is, noop, property, sort, ExprOptions, Order, QueryError,
    SortOrder,
};

#[test]
fn test_property_is_a_flat_lookup() {
    let d = json!({"prop": "hi", "a.b": 1});
    assert_eq!(property("prop").call_json(&d).unwrap(), JsValue::from("hi"));
    assert_eq!(property("a.b").call_json(&d).unwrap(), JsValue::from(1i64));
    assert_eq!(property("prop.length").call_json(&d).unwrap(), JsValue::Undefined);
    assert_eq!(property("prop").name(), "prop");
    assert_eq!(property("length").call_json(&json!("abc")).unwrap(), JsValue::from(3i64));
}

#[test]
fn test_expr_evaluates_against_record() {
    let f = expr("prop.length").unwrap();
    assert_eq!(f.name(), "prop.length");
    assert_eq!(f.call_json(&json!({"prop": "hi"})).unwrap(), JsValue::from(2i64));

    // A string record exposes `length` as a name.
    let f = expr("length > 3").unwrap();
    assert_eq!(f.call_json(&json!("Hello")).unwrap(), JsValue::from(true));

    let aliased = expr("a * 2").unwrap().alias("double");
    assert_eq!(aliased.name(), "double");
    assert_eq!(aliased.to_string(), "double");
}

#[test]
fn test_expr_passes_accessors_through() {
    let f = expr(identity()).unwrap();
    assert_eq!(f.name(), "identity");
    assert_eq!(f.call_json(&json!(5)).unwrap(), JsValue::from(5i64));
    assert_eq!(expr(noop()).unwrap().call_json(&json!(5)).unwrap(), JsValue::Undefined);
}

#[test]
fn test_expr_cannot_reach_outside_scope() {
    let f = expr("process").unwrap();
    assert_eq!(f.call_json(&json!({})).unwrap(), JsValue::Undefined);

    let strict = ExprOptions {
        eval: EvalOptions::strict(),
        ..ExprOptions::default()
    };
    let f = expr_with("process", strict).unwrap();
    assert!(matches!(
        f.call_json(&json!({})),
        Err(ExprError::UnboundName(_))
    ));
}

#[test]
fn test_expr_sanitized_keys() {
    let opts = ExprOptions {
        sanitize_keys: true,
        ..ExprOptions::default()
    };
    let f = expr_with("unit_price * 2", opts).unwrap();
    assert_eq!(f.call_json(&json!({"unit price": 4})).unwrap(), JsValue::from(8i64));
}

#[test]
fn test_expr_parse_error() {
    assert!(matches!(expr("a +"), Err(QueryError::Expr(ExprError::Parse(_)))));
}

#[test]
fn test_sort_comparators() {
    let a = json!({"n": 1, "s": "b"}).into();
    let b = json!({"n": 2, "s": "a"}).into();
    assert_eq!(sort("n", SortOrder::Default).unwrap().compare(&a, &b).unwrap(), -1.0);
    assert_eq!(sort("n desc", SortOrder::Default).unwrap().compare(&a, &b).unwrap(), 1.0);
    assert_eq!(sort("s", "DESC").unwrap().compare(&a, &b).unwrap(), -1.0);
    let numeric = sort("n", Order::DescNumeric).unwrap();
    assert_eq!(numeric.compare(&a, &b).unwrap(), 1.0);
    let custom = sort("n", Order::custom(|x, y| {
        sift_expr::util::to_number(y) * 10.0 - sift_expr::util::to_number(x)
    }))
    .unwrap();
    assert_eq!(custom.compare(&a, &b).unwrap(), 19.0);
}

#[test]
fn test_type_predicates_and_comparators() {
    assert_eq!(is::by_name("array").call_json(&json!([])).unwrap(), JsValue::from(true));
    assert!(matches!(is::is_not("date"), Err(QueryError::InvalidIsMethod(_))));
    let gt = cmp::gt(2).unwrap();
    assert_eq!(gt.name(), ">2");
    assert_eq!(gt.call_json(&json!(3)).unwrap(), JsValue::from(true));
    let like = sift_query::like("^ab").unwrap();
    assert_eq!(like.call_json(&json!("abc")).unwrap(), JsValue::from(true));
    assert_eq!(like.call_json(&json!("cab")).unwrap(), JsValue::from(false));
}
