use proptest::prelude::*;
use serde_json::{json, Value};
use sift_expr::JsValue;
use sift_query::{and, asc, compose, desc, literal, multisort, or, select, Accessor};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,4}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
    ]
}

proptest! {
    #[test]
    fn desc_negates_asc(a in scalar(), b in scalar()) {
        let (a, b) = (JsValue::Json(a), JsValue::Json(b));
        prop_assert_eq!(desc(&a, &b), -asc(&a, &b));
    }

    #[test]
    fn and_or_fold_over_constants(flags in prop::collection::vec(any::<bool>(), 0..6), d in scalar()) {
        let d = JsValue::Json(d);
        let preds: Vec<Accessor> = flags.iter().map(|&f| literal(f)).collect();
        let all = and(preds.clone()).unwrap().test(&d).unwrap();
        let any = or(preds).unwrap().test(&d).unwrap();
        prop_assert_eq!(all, flags.iter().all(|&f| f));
        prop_assert_eq!(any, flags.iter().any(|&f| f));
    }

    #[test]
    fn compose_threads_through_fields(inner in "[a-z]{0,8}") {
        let d = JsValue::Json(json!({"outer": {"inner": inner.clone()}}));
        let f = compose(["outer", "inner", "length"]);
        prop_assert_eq!(f.call(&d).unwrap(), JsValue::from(inner.chars().count() as i64));
    }

    #[test]
    fn multisort_breaks_ties_with_later_keys(pairs in prop::collection::vec((0i32..4, 0i32..100), 0..20)) {
        let rows: Vec<Value> = pairs.iter().map(|(a, b)| json!({"a": a, "b": b})).collect();
        let out = select(Vec::<&str>::new())
            .order_by(["a", "b desc"])
            .unwrap()
            .from(&rows)
            .unwrap();
        let mut expected = pairs.clone();
        expected.sort_by(|x, y| x.0.cmp(&y.0).then(y.1.cmp(&x.1)));
        let got: Vec<(i64, i64)> = out
            .iter()
            .map(|r| (r["a"].as_i64().unwrap(), r["b"].as_i64().unwrap()))
            .collect();
        let expected: Vec<(i64, i64)> = expected.iter().map(|&(a, b)| (a as i64, b as i64)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn multisort_all_ties_is_zero(a in any::<i32>()) {
        let s = multisort(["x", "y desc"]).unwrap();
        let r = JsValue::Json(json!({"x": a, "y": a}));
        prop_assert_eq!(s.compare(&r, &r.clone()).unwrap(), 0.0);
    }
}
