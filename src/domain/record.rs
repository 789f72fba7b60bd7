// ============================================================
// RAW RECORD TYPES
// ============================================================
// Nested record tree built from dotted CSV headers

use serde_json::{Map, Value};

/// One CSV data line assembled into a nested structure.
///
/// Keys come from dotted header paths (`name.firstName` lands under a
/// `name` object), leaf values are the raw cell strings. Empty cells are
/// never inserted.
pub type RawRecord = Map<String, Value>;

/// Set `value` at the nested location named by `path` (split on `.`),
/// creating intermediate objects as needed. A non-object in the middle of
/// the path is silently replaced by an object; the last segment always
/// overwrites. An empty path is a no-op.
pub fn set_nested(root: &mut RawRecord, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            if !path.is_empty() {
                root.insert(path.to_string(), value);
            }
        }
        Some((head, rest)) => {
            let child = root
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                set_nested(map, rest, value);
            }
        }
    }
}

/// Walk `path` (split on `.`) and return the value there, or `None` as
/// soon as any traversed level is missing or not an object.
pub fn get_nested<'a>(root: &'a RawRecord, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for key in segments {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

/// Nested lookup that flattens to the trimmed string value, treating
/// non-string leaves as absent.
pub fn get_nested_str<'a>(root: &'a RawRecord, path: &str) -> Option<&'a str> {
    get_nested(root, path).and_then(Value::as_str).map(str::trim)
}
