//! Path-based value lookup in JSON responses
//!
//! Response paths use '/' as separator. Locating result nodes flattens any
//! arrays met along the way, since list-valued connections can appear at
//! every level of a query response.

use serde_json::{Number, Value};

/// Locate the result nodes at a response path.
///
/// Objects are descended by key. An array met before the end of the path is
/// descended element by element and the results concatenated. The value at
/// the end of the path must itself be an array; its elements are the nodes.
///
/// # Returns
/// The nodes in response order, or `None` when the path does not resolve
pub fn locate_nodes<'a>(json: &'a Value, path: &str) -> Option<Vec<&'a Value>> {
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut nodes = Vec::new();
    if collect_nodes(json, &parts, &mut nodes) {
        Some(nodes)
    } else {
        None
    }
}

fn collect_nodes<'a>(json: &'a Value, parts: &[&str], nodes: &mut Vec<&'a Value>) -> bool {
    match (json, parts.split_first()) {
        (Value::Array(items), None) => {
            nodes.extend(items.iter());
            true
        }
        (Value::Object(map), Some((part, remaining))) => map
            .get(*part)
            .is_some_and(|value| collect_nodes(value, remaining, nodes)),
        (Value::Array(items), Some(_)) => {
            let mut resolved = true;
            for item in items {
                resolved &= collect_nodes(item, parts, nodes);
            }
            resolved
        }
        _ => false,
    }
}

/// Resolve a source path inside one node.
///
/// A path without '/' is a direct key lookup; otherwise each segment descends
/// one object level. Null values count as absent.
pub fn resolve<'a>(node: &'a Value, path: &str) -> Option<&'a Value> {
    let value = if path.contains('/') {
        path.split('/')
            .try_fold(node, |current, part| current.as_object()?.get(part))?
    } else {
        node.get(path)?
    };

    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

/// Convert a JSON value to its tag string representation
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Render a number in plain decimal form.
///
/// Integers print as integers. Floats use the shortest representation that
/// round-trips, written out without an exponent.
pub fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else if let Some(f) = n.as_f64() {
        f.to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locate_nodes_through_nested_arrays() {
        let json = json!({
            "data": {
                "allRouters": {
                    "nodes": [{
                        "nodes": {
                            "nodes": [{
                                "arp": {
                                    "nodes": [
                                        {"test-field": 128},
                                        {"test-field": 95}
                                    ]
                                }
                            }]
                        }
                    }]
                }
            }
        });

        let nodes = locate_nodes(&json, "/data/allRouters/nodes/nodes/nodes/arp/nodes/").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["test-field"], 128);
        assert_eq!(nodes[1]["test-field"], 95);
    }

    #[test]
    fn test_locate_nodes_concatenates_across_parents() {
        let json = json!({
            "data": {
                "routers": [
                    {"peers": [{"id": 1}, {"id": 2}]},
                    {"peers": [{"id": 3}]}
                ]
            }
        });

        let nodes = locate_nodes(&json, "/data/routers/peers/").unwrap();
        let ids: Vec<i64> = nodes.iter().map(|n| n["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_locate_nodes_empty_parent_list() {
        let json = json!({"data": {"routers": []}});

        assert_eq!(locate_nodes(&json, "/data/routers/peers/"), Some(vec![]));
    }

    #[test]
    fn test_locate_nodes_unresolvable() {
        assert!(locate_nodes(&json!({}), "/data/routers/").is_none());
        assert!(locate_nodes(&json!({"data": {"routers": {"id": 1}}}), "/data/routers/").is_none());
        assert!(locate_nodes(&json!({"data": {"routers": null}}), "/data/routers/").is_none());
        assert!(locate_nodes(&json!({"data": {"routers": [null]}}), "/data/routers/name/").is_none());
    }

    #[test]
    fn test_resolve_direct_and_nested() {
        let node = json!({
            "test-tag-1": "v1",
            "state": {"test-tag-2": "v2"},
            "missing": null
        });

        assert_eq!(resolve(&node, "test-tag-1"), Some(&json!("v1")));
        assert_eq!(resolve(&node, "state/test-tag-2"), Some(&json!("v2")));
        assert_eq!(resolve(&node, "missing"), None);
        assert_eq!(resolve(&node, "absent"), None);
    }

    #[test]
    fn test_resolve_nested_missing_parent() {
        assert_eq!(resolve(&json!({"state": {}}), "state/test-tag-2"), None);
        assert_eq!(resolve(&json!({}), "state/test-tag-2"), None);
        assert_eq!(resolve(&json!({"state": "up"}), "state/test-tag-2"), None);
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("text")), "text");
        assert_eq!(value_to_string(&json!(128)), "128");
        assert_eq!(value_to_string(&json!(-7)), "-7");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(null)), "");
        assert_eq!(value_to_string(&json!({"a": 1})), "{\"a\":1}");
    }

    #[test]
    fn test_format_number_plain_decimal() {
        let parse = |text: &str| -> Number { serde_json::from_str(text).unwrap() };

        assert_eq!(format_number(&parse("128")), "128");
        assert_eq!(format_number(&parse("128.0")), "128");
        assert_eq!(format_number(&parse("128.5")), "128.5");
        assert_eq!(format_number(&parse("0.25")), "0.25");
        assert_eq!(format_number(&parse("1e21")), "1000000000000000000000");
        assert_eq!(format_number(&parse("18446744073709551615")), "18446744073709551615");
    }
}
