use im::OrdMap;

use crate::common::{Value, DOC_ID};
use crate::errors::{AlmacenError, AlmacenResult, ErrorKind};
use std::fmt::{Debug, Display};

/// A schemaless document: string field names mapped to [Value]s.
///
/// Field names are opaque here; a key containing `.` is stored literally.
/// Nested access by path is the job of [`crate::store::traversal`].
///
/// The reserved field `_id` must hold a string when the document is saved
/// into a collection, see [`Document::id`].
///
/// ## Value semantics
///
/// The fields live in an `im::OrdMap` (a persistent ordered map):
/// - cloning is O(1) through internal structural sharing
/// - mutating a clone never affects the original, and vice versa
///
/// which is what lets the stores hand out copies of their documents cheaply.
#[derive(Clone, Eq, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use almacen::collection::Document;
    ///
    /// let doc = Document::new();
    /// assert!(doc.is_empty());
    /// assert_eq!(doc.size(), 0);
    /// ```
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    /// Parses a JSON object into a document.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::ObjectExpected`] if `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> AlmacenResult<Document> {
        Document::try_from(Value::from(json))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Associates `value` with the top-level field `key`, returning the
    /// previous value if there was one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use almacen::collection::Document;
    /// use almacen::common::Value;
    ///
    /// let mut doc = Document::new();
    /// doc.put("status", "inactive");
    /// let previous = doc.put("status", "active");
    /// assert_eq!(previous, Some(Value::from("inactive")));
    /// ```
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Returns the value of the top-level field `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns a mutable reference to the value of the top-level field `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    /// Removes the top-level field `key`, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the number of top-level fields.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns the document identifier.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::IdNotString`] if `_id` is missing or is not a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use almacen::doc;
    /// use almacen::errors::ErrorKind;
    ///
    /// let doc = doc!{ "_id": "k", "a": 1 };
    /// assert_eq!(doc.id().unwrap(), "k");
    ///
    /// let doc = doc!{ "_id": 42 };
    /// assert_eq!(doc.id().unwrap_err().kind(), &ErrorKind::IdNotString);
    /// ```
    pub fn id(&self) -> AlmacenResult<&str> {
        match self.data.get(DOC_ID) {
            Some(Value::String(id)) => Ok(id),
            _ => Err(AlmacenError::from(ErrorKind::IdNotString)),
        }
    }

    /// Sets the `_id` field.
    pub fn set_id(&mut self, id: &str) {
        self.data.insert(DOC_ID.to_string(), Value::from(id));
    }

    pub fn has_id(&self) -> bool {
        self.data.contains_key(DOC_ID)
    }

    /// Gets an iterator over the top-level fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Converts this document into a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .data
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }

    pub(crate) fn to_debug_string(&self) -> String {
        let fields: Vec<String> = self
            .data
            .iter()
            .map(|(key, value)| format!("{:?}: {}", key, value.to_debug_string()))
            .collect();
        format!("{{{}}}", fields.join(", "))
    }
}

impl TryFrom<Value> for Document {
    type Error = AlmacenError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Document(doc) => Ok(doc),
            _ => Err(AlmacenError::from(ErrorKind::ObjectExpected)),
        }
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string())
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// # Examples
///
/// ```rust
/// use almacen::doc;
///
/// let empty = doc!{};
///
/// let nested = doc!{
///     "_id": "ID",
///     "x": {
///         "y": { "z": 12 }
///     },
///     "tags": ["a", "b"],
///     "score": (10 * 2)
/// };
/// assert_eq!(nested.size(), 4);
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::collection::Document::new()
    };

    () => {
        $crate::collection::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value));
            )*
            doc
        }
    };
}

/// Helper macro converting values for the [doc!] macro.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use serde_json::json;

    fn set_up() -> Document {
        doc!{
            "_id": "ID",
            "x": {
                "y": {
                    "z": 12
                }
            },
            "a": "A",
            "list": [1, 2, 3]
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("\"ABC\""), "ABC");
        assert_eq!(normalize("ABC"), "ABC");
    }

    #[test]
    fn test_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc, doc!{});
    }

    #[test]
    fn test_put_and_get() {
        let mut doc = Document::new();
        assert_eq!(doc.put("name", "Alice"), None);
        assert_eq!(doc.get("name"), Some(&Value::from("Alice")));
        assert_eq!(doc.get("missing"), None);
    }

    #[test]
    fn test_dotted_key_is_literal() {
        let mut doc = Document::new();
        doc.put("x.y", 1);
        assert!(doc.contains_key("x.y"));
        assert!(!doc.contains_key("x"));
    }

    #[test]
    fn test_remove() {
        let mut doc = set_up();
        assert_eq!(doc.remove("a"), Some(Value::from("A")));
        assert_eq!(doc.remove("a"), None);
        assert_eq!(doc.size(), 3);
    }

    #[test]
    fn test_get_mut_changes_nested_value() {
        let mut doc = set_up();
        if let Some(Value::Document(x)) = doc.get_mut("x") {
            x.put("new", true);
        }
        assert_eq!(
            doc.get("x").and_then(|x| x.as_document()).and_then(|x| x.get("new")),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_id() {
        let doc = set_up();
        assert_eq!(doc.id().unwrap(), "ID");
        assert!(doc.has_id());
    }

    #[test]
    fn test_id_missing() {
        let doc = doc!{ "a": 1 };
        let err = doc.id().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IdNotString);
    }

    #[test]
    fn test_id_not_string() {
        let doc = doc!{ "_id": 42 };
        let err = doc.id().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IdNotString);
    }

    #[test]
    fn test_set_id() {
        let mut doc = doc!{ "_id": 42 };
        doc.set_id("k");
        assert_eq!(doc.id().unwrap(), "k");
    }

    #[test]
    fn test_clone_is_independent() {
        let original = set_up();
        let mut copy = original.clone();
        if let Some(Value::Document(x)) = copy.get_mut("x") {
            x.remove("y");
        }
        copy.put("a", "B");

        assert_eq!(original, set_up());
        assert_ne!(original, copy);
    }

    #[test]
    fn test_iter_in_key_order() {
        let doc = doc!{ "b": 2, "a": 1 };
        let keys: Vec<&String> = doc.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_try_from_value() {
        let doc = Document::try_from(Value::Document(set_up())).unwrap();
        assert_eq!(doc, set_up());

        let err = Document::try_from(Value::from("scalar")).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ObjectExpected);
    }

    #[test]
    fn test_from_json() {
        let doc = Document::from_json(json!({"_id": "ID", "x": {"y": {"z": 12}}})).unwrap();
        assert_eq!(doc.id().unwrap(), "ID");

        let err = Document::from_json(json!([1, 2])).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ObjectExpected);
    }

    #[test]
    fn test_to_json() {
        let doc = set_up();
        assert_eq!(
            doc.to_json(),
            json!({"_id": "ID", "x": {"y": {"z": 12}}, "a": "A", "list": [1, 2, 3]})
        );
    }

    #[test]
    fn test_display() {
        let doc = doc!{ "a": 1 };
        assert_eq!(doc.to_string(), r#"{"a":1}"#);
    }

    #[test]
    fn test_debug() {
        let doc = doc!{ "a": 1 };
        assert_eq!(format!("{:?}", doc), r#"{"a": i64(1)}"#);
    }

    #[test]
    fn test_macro_with_variables() {
        let name = "Alice";
        let age = 30;
        let doc = doc!{ "name": name, "age": age, "double": (age * 2) };
        assert_eq!(doc.get("name"), Some(&Value::from("Alice")));
        assert_eq!(doc.get("double"), Some(&Value::I64(60)));
    }

    #[test]
    fn test_macro_with_nested_arrays() {
        let doc = doc!{ "m": [[1, 2], { "k": "v" }] };
        let expected = Value::Array(vec![
            Value::Array(vec![Value::I64(1), Value::I64(2)]),
            Value::Document(doc!{ "k": "v" }),
        ]);
        assert_eq!(doc.get("m"), Some(&expected));
    }
}
