//! Field-path resolution shared by every backend.
//!
//! A path `s1.s2...sn` is resolved in two steps: walk `s1 .. s(n-1)` down
//! through nested documents to reach the *parent*, then apply the leaf
//! operation to field `sn` of that parent. A missing root document, a
//! missing intermediate field and an intermediate field that is not a
//! document all count as "no parent".
//!
//! What "no parent" means depends on the operation:
//!
//! | Operation      | no parent          | leaf missing       |
//! |----------------|--------------------|--------------------|
//! | `find_field`   | `NotFound`         | `NotFound`         |
//! | `update_field` | `TraversingObject` | field is created   |
//! | `delete_field` | no-op              | no-op              |
//!
//! Backends load the root document (if any), call one of these functions
//! and persist the result, so the table above holds for all of them.

use crate::collection::Document;
use crate::common::{FieldPath, Value, DOC_ID};
use crate::errors::{AlmacenError, AlmacenResult, ErrorKind};

/// Walks `path.parents()` from `root` and returns the parent of the target field.
pub fn resolve_parent<'a>(root: Option<&'a Document>, path: &FieldPath) -> Option<&'a Document> {
    let mut current = root?;
    for segment in path.parents() {
        match current.get(segment) {
            Some(Value::Document(nested)) => current = nested,
            _ => return None,
        }
    }
    Some(current)
}

/// Mutable counterpart of [resolve_parent].
pub fn resolve_parent_mut<'a>(
    root: Option<&'a mut Document>,
    path: &FieldPath,
) -> Option<&'a mut Document> {
    let mut current = root?;
    for segment in path.parents() {
        match current.get_mut(segment) {
            Some(Value::Document(nested)) => current = nested,
            _ => return None,
        }
    }
    Some(current)
}

/// Returns a copy of the value at `path`.
///
/// # Errors
///
/// [`ErrorKind::NotFound`] if the document, any intermediate document or the
/// leaf field is missing.
pub fn find_field(root: Option<&Document>, path: &FieldPath) -> AlmacenResult<Value> {
    resolve_parent(root, path)
        .and_then(|parent| parent.get(path.target()))
        .cloned()
        .ok_or_else(|| AlmacenError::from(ErrorKind::NotFound))
}

/// Sets the field at `path` to `value`, creating the leaf if absent.
/// Intermediate documents are never created.
///
/// The top-level `_id` may only be "updated" to the value it already holds;
/// any other value would detach the document from the key it is stored under.
///
/// # Errors
///
/// - [`ErrorKind::TraversingObject`] if the parent cannot be resolved.
/// - [`ErrorKind::IdNotString`] for a top-level `_id` update that changes it.
///
/// The document is left untouched on error.
pub fn update_field(root: Option<&mut Document>, path: &FieldPath, value: Value) -> AlmacenResult<()> {
    let parent = resolve_parent_mut(root, path)
        .ok_or_else(|| AlmacenError::from(ErrorKind::TraversingObject))?;

    if !path.is_nested() && path.target() == DOC_ID && parent.get(DOC_ID) != Some(&value) {
        log::warn!("Rejected update of {} to {}", DOC_ID, value);
        return Err(AlmacenError::from(ErrorKind::IdNotString));
    }

    parent.put(path.target(), value);
    Ok(())
}

/// Removes the field at `path` if it can be resolved. Never fails.
///
/// The top-level `_id` is never removed.
///
/// Returns `true` if a field was removed, so callers know whether anything
/// needs to be written back.
pub fn delete_field(root: Option<&mut Document>, path: &FieldPath) -> bool {
    if !path.is_nested() && path.target() == DOC_ID {
        return false;
    }
    match resolve_parent_mut(root, path) {
        Some(parent) => parent.remove(path.target()).is_some(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    fn nested() -> Document {
        doc!{
            "_id": "ID",
            "x": {
                "y": {
                    "z": 12
                }
            },
            "a": "A"
        }
    }

    #[test]
    fn test_resolve_parent_single_segment_is_root() {
        let doc = nested();
        let parent = resolve_parent(Some(&doc), &FieldPath::new("a")).unwrap();
        assert_eq!(parent, &doc);
    }

    #[test]
    fn test_resolve_parent_nested() {
        let doc = nested();
        let parent = resolve_parent(Some(&doc), &FieldPath::new("x.y.z")).unwrap();
        assert_eq!(parent, &doc!{ "z": 12 });
    }

    #[test]
    fn test_resolve_parent_without_root() {
        assert!(resolve_parent(None, &FieldPath::new("a")).is_none());
        assert!(resolve_parent_mut(None, &FieldPath::new("a")).is_none());
    }

    #[test]
    fn test_resolve_parent_through_scalar() {
        let doc = nested();
        assert!(resolve_parent(Some(&doc), &FieldPath::new("a.b")).is_none());
        assert!(resolve_parent(Some(&doc), &FieldPath::new("x.y.z.t")).is_none());
    }

    #[test]
    fn test_resolve_parent_through_missing() {
        let doc = nested();
        assert!(resolve_parent(Some(&doc), &FieldPath::new("q.r")).is_none());
    }

    #[test]
    fn test_resolve_parent_does_not_descend_arrays() {
        let doc = doc!{ "list": [{ "k": 1 }] };
        assert!(resolve_parent(Some(&doc), &FieldPath::new("list.0.k")).is_none());
    }

    #[test]
    fn test_find_field_levels() {
        let doc = nested();
        assert_eq!(
            find_field(Some(&doc), &FieldPath::new("x")).unwrap(),
            Value::Document(doc!{ "y": { "z": 12 } })
        );
        assert_eq!(
            find_field(Some(&doc), &FieldPath::new("x.y")).unwrap(),
            Value::Document(doc!{ "z": 12 })
        );
        assert_eq!(find_field(Some(&doc), &FieldPath::new("x.y.z")).unwrap(), Value::I64(12));
    }

    #[test]
    fn test_find_field_unmatched_suffix() {
        let doc = nested();
        for path in ["x.t", "x.y.t", "x.y.z.t", "t"] {
            let err = find_field(Some(&doc), &FieldPath::new(path)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound, "path {}", path);
        }
    }

    #[test]
    fn test_find_field_without_root() {
        let err = find_field(None, &FieldPath::new("x")).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotFound);
    }

    #[test]
    fn test_find_field_returns_copy() {
        let doc = nested();
        let mut value = find_field(Some(&doc), &FieldPath::new("x")).unwrap();
        if let Some(x) = value.as_document_mut() {
            x.put("y", "CHANGED");
        }
        assert_eq!(doc, nested());
    }

    #[test]
    fn test_update_field_nested() {
        let mut doc = nested();
        update_field(Some(&mut doc), &FieldPath::new("x.y.z"), Value::from("CHANGED")).unwrap();
        assert_eq!(
            doc,
            doc!{ "_id": "ID", "x": { "y": { "z": "CHANGED" } }, "a": "A" }
        );
    }

    #[test]
    fn test_update_field_root_level_creates() {
        let mut doc = nested();
        update_field(Some(&mut doc), &FieldPath::new("b"), Value::from(true)).unwrap();
        assert_eq!(doc.get("b"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_update_field_creates_leaf_in_existing_parent() {
        let mut doc = nested();
        update_field(Some(&mut doc), &FieldPath::new("x.y.w"), Value::from(1)).unwrap();
        assert_eq!(
            find_field(Some(&doc), &FieldPath::new("x.y")).unwrap(),
            Value::Document(doc!{ "z": 12, "w": 1 })
        );
    }

    #[test]
    fn test_update_field_through_scalar_fails() {
        let mut doc = nested();
        let err = update_field(Some(&mut doc), &FieldPath::new("x.y.z.t"), Value::from(1)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TraversingObject);
        assert_eq!(doc, nested());
    }

    #[test]
    fn test_update_field_does_not_create_intermediates() {
        let mut doc = nested();
        let err = update_field(Some(&mut doc), &FieldPath::new("p.q"), Value::from(1)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TraversingObject);
        assert!(!doc.contains_key("p"));
    }

    #[test]
    fn test_update_field_without_root() {
        let err = update_field(None, &FieldPath::new("a"), Value::from(1)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TraversingObject);
    }

    #[test]
    fn test_update_field_rejects_id_change() {
        let mut doc = nested();
        let err = update_field(Some(&mut doc), &FieldPath::new("_id"), Value::from("OTHER")).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IdNotString);
        assert_eq!(doc, nested());

        update_field(Some(&mut doc), &FieldPath::new("_id"), Value::from("ID")).unwrap();
        assert_eq!(doc, nested());
    }

    #[test]
    fn test_update_nested_id_is_plain_field() {
        let mut doc = nested();
        update_field(Some(&mut doc), &FieldPath::new("x._id"), Value::from(5)).unwrap();
        assert_eq!(find_field(Some(&doc), &FieldPath::new("x._id")).unwrap(), Value::I64(5));
    }

    #[test]
    fn test_delete_field_nested() {
        let mut doc = nested();
        assert!(delete_field(Some(&mut doc), &FieldPath::new("x.y.z")));
        assert_eq!(doc, doc!{ "_id": "ID", "x": { "y": {} }, "a": "A" });
    }

    #[test]
    fn test_delete_field_unresolvable_is_noop() {
        let mut doc = nested();
        assert!(!delete_field(Some(&mut doc), &FieldPath::new("x.y.z.t")));
        assert!(!delete_field(Some(&mut doc), &FieldPath::new("q.r")));
        assert!(!delete_field(Some(&mut doc), &FieldPath::new("missing")));
        assert_eq!(doc, nested());
    }

    #[test]
    fn test_delete_field_without_root() {
        assert!(!delete_field(None, &FieldPath::new("a")));
    }

    #[test]
    fn test_delete_field_keeps_id() {
        let mut doc = nested();
        assert!(!delete_field(Some(&mut doc), &FieldPath::new("_id")));
        assert_eq!(doc.id().unwrap(), "ID");
    }
}
