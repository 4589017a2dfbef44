//! Dotted-path navigation over a JSON document
//!
//! A path such as `guild.123.settings.prefix` is split on `.`. Each segment
//! is a mapping key, or an integer index when the current node is a sequence.
//! Negative indices count from the end of the sequence.
//!
//! Reads never fail: any structural miss collapses into [`Resolved::NotFound`].
//! Writes fail loudly when they would have to guess, e.g. indexing past the
//! end of a sequence or descending into a scalar.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Outcome of walking a path through a document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// The path leads to this node
    Found(&'a Value),
    /// Some segment along the path did not resolve
    NotFound,
}

impl<'a> Resolved<'a> {
    /// Convert into an `Option`, treating a stored `null` as absent
    #[must_use]
    pub fn present(self) -> Option<&'a Value> {
        match self {
            Resolved::Found(Value::Null) | Resolved::NotFound => None,
            Resolved::Found(value) => Some(value),
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Resolved::Found(_))
    }
}

/// Split a path into its segments
pub fn segments(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

/// Interpret a segment as an index into a sequence of `len` elements.
///
/// Returns `None` if the segment is not an integer or falls outside the sequence.
fn index_in(segment: &str, len: usize) -> Option<usize> {
    let raw: i64 = segment.trim().parse().ok()?;
    let index = if raw < 0 {
        i64::try_from(len).ok()? + raw
    } else {
        raw
    };
    let index = usize::try_from(index).ok()?;
    (index < len).then_some(index)
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => index_in(segment, items.len()).map(|i| &items[i]),
        _ => None,
    }
}

fn step_mut<'a>(node: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => {
            let index = index_in(segment, items.len())?;
            items.get_mut(index)
        }
        _ => None,
    }
}

/// Walk `path` through `doc`
pub fn resolve<'a>(doc: &'a Value, path: &str) -> Resolved<'a> {
    let mut node = doc;
    for segment in path.split('.') {
        match step(node, segment) {
            Some(next) => node = next,
            None => return Resolved::NotFound,
        }
    }
    Resolved::Found(node)
}

/// Assign `value` at `path`, creating missing intermediate mappings.
///
/// With `only_if_absent`, an existing key (or in-range index) is left alone.
/// Returns whether the document was modified.
pub(crate) fn assign(doc: &mut Value, path: &str, value: Value, only_if_absent: bool) -> Result<bool> {
    let parts = segments(path);
    let Some((last, parents)) = parts.split_last() else {
        return Ok(false);
    };

    let mut node = doc;
    let mut reached_by = "";
    for &segment in parents {
        node = descend_or_create(node, segment, reached_by, path)?;
        reached_by = segment;
    }

    match node {
        Value::Object(map) => {
            if only_if_absent && map.contains_key(*last) {
                return Ok(false);
            }
            map.insert((*last).to_string(), value);
            Ok(true)
        }
        Value::Array(items) => {
            let index = sequence_index(last, items.len(), path)?;
            if only_if_absent {
                return Ok(false);
            }
            items[index] = value;
            Ok(true)
        }
        _ => Err(Error::NotAContainer {
            path: path.to_string(),
            segment: reached_by.to_string(),
        }),
    }
}

fn descend_or_create<'a>(
    node: &'a mut Value,
    segment: &str,
    reached_by: &str,
    path: &str,
) -> Result<&'a mut Value> {
    match node {
        Value::Object(map) => Ok(map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let index = sequence_index(segment, items.len(), path)?;
            Ok(&mut items[index])
        }
        _ => Err(Error::NotAContainer {
            path: path.to_string(),
            segment: reached_by.to_string(),
        }),
    }
}

/// Index lookup for writes: sequences are never auto-extended
fn sequence_index(segment: &str, len: usize, path: &str) -> Result<usize> {
    let raw: i64 = segment.trim().parse().map_err(|_| Error::InvalidIndex {
        path: path.to_string(),
        segment: segment.to_string(),
    })?;
    index_in(segment, len).ok_or_else(|| Error::IndexOutOfRange {
        path: path.to_string(),
        index: raw,
        len,
    })
}

/// Detach and return the node at `path`, if the parent and final segment resolve
pub(crate) fn detach(doc: &mut Value, path: &str) -> Option<Value> {
    let parts = segments(path);
    let (last, parents) = parts.split_last()?;

    let mut node = doc;
    for segment in parents {
        node = step_mut(node, segment)?;
    }

    match node {
        Value::Object(map) => map.remove(*last),
        Value::Array(items) => {
            let index = index_in(last, items.len())?;
            Some(items.remove(index))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_nested_mapping() {
        let doc = json!({"guild": {"123": {"settings": {"prefix": "!"}}}});
        assert_eq!(
            resolve(&doc, "guild.123.settings.prefix"),
            Resolved::Found(&json!("!"))
        );
    }

    #[test]
    fn test_resolve_misses_are_not_found() {
        let doc = json!({"a": [1, 2, 3], "s": "text"});

        assert_eq!(resolve(&doc, "a.b.c"), Resolved::NotFound);
        assert_eq!(resolve(&doc, "a.x"), Resolved::NotFound);
        assert_eq!(resolve(&doc, "a.3"), Resolved::NotFound);
        assert_eq!(resolve(&doc, "s.0"), Resolved::NotFound);
        assert_eq!(resolve(&json!({}), "a.b.c"), Resolved::NotFound);
    }

    #[test]
    fn test_resolve_sequence_indices() {
        let doc = json!({"a": [10, {"b": "deep"}, 30]});

        assert_eq!(resolve(&doc, "a.0"), Resolved::Found(&json!(10)));
        assert_eq!(resolve(&doc, "a.1.b"), Resolved::Found(&json!("deep")));
        assert_eq!(resolve(&doc, "a.-1"), Resolved::Found(&json!(30)));
        assert_eq!(resolve(&doc, "a.-4"), Resolved::NotFound);
    }

    #[test]
    fn test_null_is_found_but_not_present() {
        let doc = json!({"a": null});
        let resolved = resolve(&doc, "a");

        assert!(resolved.is_found());
        assert_eq!(resolved.present(), None);
    }

    #[test]
    fn test_assign_creates_intermediate_mappings() {
        let mut doc = json!({});
        assert!(assign(&mut doc, "a.b.c", json!(1), false).unwrap());
        assert_eq!(doc, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_assign_only_if_absent_keeps_existing_null() {
        let mut doc = json!({"a": null});
        assert!(!assign(&mut doc, "a", json!(1), true).unwrap());
        assert_eq!(doc, json!({"a": null}));
    }

    #[test]
    fn test_assign_through_sequence() {
        let mut doc = json!({"list": [{"name": "x"}, {"name": "y"}]});
        assign(&mut doc, "list.1.name", json!("z"), false).unwrap();
        assign(&mut doc, "list.0", json!("replaced"), false).unwrap();

        assert_eq!(doc, json!({"list": ["replaced", {"name": "z"}]}));
    }

    #[test]
    fn test_assign_out_of_range_fails() {
        let mut doc = json!({"list": [1]});

        let err = assign(&mut doc, "list.5.name", json!(1), false).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 5, len: 1, .. }));

        let err = assign(&mut doc, "list.5", json!(1), false).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { .. }));

        let err = assign(&mut doc, "list.-2", json!(1), false).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: -2, len: 1, .. }));

        let err = assign(&mut doc, "list.first", json!(1), false).unwrap_err();
        assert!(matches!(err, Error::InvalidIndex { .. }));

        assert_eq!(doc, json!({"list": [1]}));
    }

    #[test]
    fn test_assign_into_scalar_fails() {
        let mut doc = json!({"a": 5});
        let err = assign(&mut doc, "a.b", json!(1), false).unwrap_err();

        match err {
            Error::NotAContainer { segment, .. } => assert_eq!(segment, "a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_detach() {
        let mut doc = json!({"a": {"b": 1}, "l": [1, 2, 3]});

        assert_eq!(detach(&mut doc, "a.b"), Some(json!(1)));
        assert_eq!(detach(&mut doc, "a.b"), None);
        assert_eq!(detach(&mut doc, "x.y"), None);
        assert_eq!(detach(&mut doc, "l.1"), Some(json!(2)));
        assert_eq!(doc, json!({"a": {}, "l": [1, 3]}));
    }
}
