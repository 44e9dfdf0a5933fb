use proptest::prelude::*;
use serde_json::{json, Value};
use sift_util::{deep_equal, flatten, stable_sort_by};

fn nested_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,4}".prop_map(|s| json!(s)),
        Just(json!(null)),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::Array)
    })
}

proptest! {
    #[test]
    fn flatten_is_idempotent(values in prop::collection::vec(nested_value(), 0..8)) {
        let once = flatten(&values);
        let twice = flatten(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn flatten_leaves_no_arrays(values in prop::collection::vec(nested_value(), 0..8)) {
        prop_assert!(flatten(&values).iter().all(|v| !v.is_array()));
    }

    #[test]
    fn deep_equal_is_reflexive(value in nested_value()) {
        prop_assert!(deep_equal(&value, &value));
    }

    #[test]
    fn stable_sort_matches_std(mut items in prop::collection::vec((0u8..5, any::<u16>()), 0..120)) {
        let mut expected = items.clone();
        expected.sort_by(|a, b| a.0.cmp(&b.0));
        stable_sort_by(&mut items, |a, b| a.0.cmp(&b.0));
        prop_assert_eq!(items, expected);
    }
}
