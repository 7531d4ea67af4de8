//! Reads and writes against an in-memory JSON document tree.

use serde_json::{Map, Value};

use super::StorePath;

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

pub(super) fn lookup(root: &Value, path: &StorePath) -> Option<Value> {
    let node = path
        .segments()
        .iter()
        .try_fold(root, |node, segment| node.as_object()?.get(segment))?;

    if is_empty(node) {
        None
    } else {
        Some(node.clone())
    }
}

/// Overwrite the value at `path`, creating parents as needed. Writing null
/// deletes, and parents left empty are pruned.
pub(super) fn write(root: &mut Value, path: &StorePath, value: Value) {
    write_at(root, path.segments(), value);
    if is_empty(root) {
        *root = Value::Null;
    }
}

fn write_at(node: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    if !node.is_object() {
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }

    if let Value::Object(map) = node {
        let child = map.entry(head.clone()).or_insert(Value::Null);
        write_at(child, rest, value);
        if is_empty(child) {
            map.remove(head);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_creates_parents() {
        let mut root = Value::Null;
        let path = StorePath::parse("attendance/a@b_c/2025-03-07").unwrap();
        write(&mut root, &path, json!(true));

        assert_eq!(root, json!({"attendance": {"a@b_c": {"2025-03-07": true}}}));
        assert_eq!(lookup(&root, &path), Some(json!(true)));
    }

    #[test]
    fn test_write_null_prunes_empty_parents() {
        let mut root = json!({"events": {"2025-03-07": {"k1": {"title": "Expo"}}}, "other": 1});
        let path = StorePath::parse("events/2025-03-07/k1").unwrap();
        write(&mut root, &path, Value::Null);

        assert_eq!(root, json!({"other": 1}));
    }

    #[test]
    fn test_lookup_missing_and_through_leaf() {
        let root = json!({"a": {"b": 1}});
        assert_eq!(lookup(&root, &StorePath::parse("a/x").unwrap()), None);
        assert_eq!(lookup(&root, &StorePath::parse("a/b/c").unwrap()), None);
        assert_eq!(lookup(&root, &StorePath::root()), Some(root.clone()));
    }

    #[test]
    fn test_write_replaces_leaf_with_object() {
        let mut root = json!({"a": 1});
        write(&mut root, &StorePath::parse("a/b").unwrap(), json!("x"));
        assert_eq!(root, json!({"a": {"b": "x"}}));
    }
}
