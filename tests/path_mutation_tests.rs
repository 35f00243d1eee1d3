use proptest::prelude::*;
use serde_json::{json, Value};
use storyboard_lib::storyboard::path::{get_at, set_at, PathSegment};

fn key(name: &str) -> PathSegment {
    PathSegment::from(name)
}

#[test]
fn set_at_replaces_nested_value_without_touching_input() {
    let tree = json!({"video_module": {"sequence": [{"motion": "walk"}, {"motion": "run"}]}});
    let path = vec![key("video_module"), key("sequence"), PathSegment::from(1), key("motion")];
    let updated = set_at(&tree, &path, json!("sprint")).expect("path exists");
    assert_eq!(updated["video_module"]["sequence"][1]["motion"], "sprint");
    assert_eq!(tree["video_module"]["sequence"][1]["motion"], "run");
}

#[test]
fn set_at_inserts_missing_final_key() {
    let tree = json!({"location_baseline": {"setting": "plaza"}});
    let path = vec![key("location_baseline"), key("details")];
    let updated = set_at(&tree, &path, json!("rain")).expect("parent exists");
    assert_eq!(updated["location_baseline"]["details"], "rain");
}

#[test]
fn set_at_rejects_missing_intermediate_segment() {
    let tree = json!({"a": {}});
    let err = set_at(&tree, &[key("a"), key("b"), key("c")], json!(1)).expect_err("b is missing");
    assert_eq!(err.code(), "INVALID_INPUT");
    assert!(err.to_string().contains("a.b.c"), "{err}");
}

#[test]
fn set_at_rejects_out_of_range_index() {
    let tree = json!({"items": [1, 2]});
    let err = set_at(&tree, &[key("items"), PathSegment::from(2)], json!(3)).expect_err("index 2");
    assert_eq!(err.code(), "INVALID_INPUT");
}

#[test]
fn empty_path_replaces_the_root() {
    let updated = set_at(&json!({"a": 1}), &[], json!([true])).expect("root");
    assert_eq!(updated, json!([true]));
}

#[test]
fn path_segments_deserialize_from_mixed_json() {
    let path: Vec<PathSegment> =
        serde_json::from_value(json!(["video_module", "sequence", 0, "motion"])).expect("path");
    assert_eq!(path[2], PathSegment::Index(0));
    assert_eq!(path[3], key("motion"));
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Value::from),
            prop::collection::btree_map("[a-c]", inner, 1..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Every path that resolves in `tree`, root included.
fn paths(tree: &Value) -> Vec<Vec<PathSegment>> {
    let mut out = vec![Vec::new()];
    match tree {
        Value::Object(map) => {
            for (name, child) in map {
                for mut rest in paths(child) {
                    rest.insert(0, PathSegment::from(name.as_str()));
                    out.push(rest);
                }
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                for mut rest in paths(child) {
                    rest.insert(0, PathSegment::from(idx));
                    out.push(rest);
                }
            }
        }
        _ => {}
    }
    out
}

fn is_prefix(prefix: &[PathSegment], path: &[PathSegment]) -> bool {
    prefix.len() <= path.len() && path[..prefix.len()] == *prefix
}

proptest! {
    #[test]
    fn set_at_leaves_unrelated_paths_alone(
        doc in tree(),
        value in leaf(),
        pick_p in any::<prop::sample::Index>(),
    ) {
        let all = paths(&doc);
        let p = pick_p.get(&all).clone();
        let updated = set_at(&doc, &p, value.clone()).expect("existing path");
        prop_assert_eq!(get_at(&updated, &p), Some(&value));

        for q in &all {
            if is_prefix(q, &p) || is_prefix(&p, q) {
                continue;
            }
            prop_assert_eq!(get_at(&updated, q), get_at(&doc, q));
        }
    }
}
