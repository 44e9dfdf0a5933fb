use proptest::prelude::*;
use serde_json::json;
use sift_expr::{evaluate, parse, JsValue, Scope};

proptest! {
    #[test]
    fn arbitrary_input_never_panics(src in "\\PC{0,40}") {
        let env = JsValue::Json(json!({"a": 1, "s": "text", "xs": [1, 2]}));
        let _ = evaluate(&src, &Scope::with_env(&env));
    }

    #[test]
    fn integer_arithmetic_matches_native(a in -1000i64..1000, b in -1000i64..1000) {
        let env = JsValue::Json(json!({"a": a, "b": b}));
        let scope = Scope::with_env(&env);
        prop_assert_eq!(evaluate("a + b", &scope).unwrap(), JsValue::from(a + b));
        prop_assert_eq!(evaluate("a * b", &scope).unwrap(), JsValue::from(a * b));
        prop_assert_eq!(evaluate("a < b", &scope).unwrap(), JsValue::from(a < b));
    }

    #[test]
    fn printed_tree_reparses(a in 0u32..100, b in 0u32..100, op in prop::sample::select(vec!["+", "-", "*", "<", "===", "&&"])) {
        let src = format!("x {} ({} {} y) ? {} : -{}", op, a, op, b, a);
        let expr = parse(&src).unwrap();
        prop_assert_eq!(parse(&expr.to_string()).unwrap(), expr);
    }
}
