use crate::collection::Document;
use std::fmt::{Debug, Display, Formatter};

/// Compare two floats for equality with proper NaN handling.
#[inline]
fn num_eq_float(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        true
    } else {
        a == b
    }
}

/// Represents a [Document] field value.
///
/// A value is a JSON-like tree: scalars ([Value::Null], [Value::Bool],
/// [Value::I64], [Value::F64], [Value::String]), nested documents and
/// ordered arrays. Documents form a tree by construction, there are no
/// back-references.
///
/// # Usage
/// ```rust
/// use almacen::common::Value;
/// use almacen::doc;
///
/// let v1: Value = 42.into();
/// let v2 = Value::from("hello");
/// let v3 = Value::Document(doc!{ "z": 12 });
/// assert_eq!(v1.as_i64(), Some(&42));
/// assert!(v2.is_string());
/// assert!(v3.is_document());
/// ```
#[derive(Clone, Default, serde::Deserialize, serde::Serialize)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents an integral number.
    I64(i64),
    /// Represents a floating point number.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents a nested document.
    Document(Document),
    /// Represents an ordered list of values.
    Array(Vec<Value>),
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => *a == *b,
            (Value::I64(a), Value::I64(b)) => *a == *b,
            (Value::F64(a), Value::F64(b)) => num_eq_float(*a, *b),
            (Value::String(a), Value::String(b)) => *a == *b,
            (Value::Document(a), Value::Document(b)) => *a == *b,
            (Value::Array(a), Value::Array(b)) => *a == *b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    #[inline]
    pub fn as_bool(&self) -> Option<&bool> {
        match self {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<&i64> {
        match self {
            Value::I64(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<&f64> {
        match self {
            Value::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the string value if the [Value] is [Value::String].
    #[inline]
    pub fn as_string(&self) -> Option<&String> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the nested document if the [Value] is [Value::Document].
    ///
    /// Returns a reference to the contained Document without cloning.
    #[inline]
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the mutable nested document if the [Value] is [Value::Document].
    #[inline]
    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` for [Value::I64] and [Value::F64].
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::I64(_) | Value::F64(_))
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Moves the value out, leaving [Value::Null] behind.
    pub fn take(&mut self) -> Value {
        std::mem::replace(self, Value::Null)
    }

    /// Converts this value into a [serde_json::Value].
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::I64(v) => serde_json::Value::from(*v),
            Value::F64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::Document(v) => v.to_json(),
            Value::Array(v) => serde_json::Value::Array(v.iter().map(Value::to_json).collect()),
        }
    }

    pub(crate) fn to_debug_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => format!("bool({})", v),
            Value::I64(v) => format!("i64({})", v),
            Value::F64(v) => format!("f64({})", v),
            Value::String(v) => format!("string({:?})", v),
            Value::Document(v) => format!("object({})", v.to_debug_string()),
            Value::Array(v) => {
                let items: Vec<String> = v.iter().map(Value::to_debug_string).collect();
                format!("array([{}])", items.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<u32> for Value {
    #[inline]
    fn from(value: u32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<usize> for Value {
    #[inline]
    fn from(value: usize) -> Self {
        Value::I64(value as i64)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    #[inline]
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<Document> for Value {
    #[inline]
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::I64(i),
                None => Value::F64(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(v) => Value::String(v),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut doc = Document::new();
                for (key, value) in map {
                    doc.put(key, Value::from(value));
                }
                Value::Document(doc)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use serde_json::json;

    #[test]
    fn test_default_is_null() {
        assert!(Value::default().is_null());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(12), Value::I64(12));
        assert_eq!(Value::from(12u32), Value::I64(12));
        assert_eq!(Value::from(1.5), Value::F64(1.5));
        assert_eq!(Value::from("A"), Value::String("A".to_string()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(
            Value::from(vec![1, 2]),
            Value::Array(vec![Value::I64(1), Value::I64(2)])
        );
    }

    #[test]
    fn test_int_and_float_are_distinct() {
        assert_ne!(Value::I64(1), Value::F64(1.0));
    }

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
    }

    #[test]
    fn test_accessors() {
        let mut value = Value::Document(doc!{ "z": 12 });
        assert!(value.as_document().is_some());
        assert!(value.as_string().is_none());
        if let Some(nested) = value.as_document_mut() {
            nested.put("z", "CHANGED");
        }
        assert_eq!(
            value.as_document().and_then(|d| d.get("z")),
            Some(&Value::from("CHANGED"))
        );
    }

    #[test]
    fn test_take_leaves_null() {
        let mut value = Value::from("A");
        let taken = value.take();
        assert_eq!(taken, Value::from("A"));
        assert!(value.is_null());
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({"x": {"y": [1, 2.5, "s", null, true]}}));
        let expected = Value::Document(doc!{
            "x": {
                "y": [1, 2.5, "s", (Value::Null), true]
            }
        });
        assert_eq!(value, expected);
    }

    #[test]
    fn test_to_json() {
        let value = Value::Document(doc!{ "a": 1, "b": [true, "x"], "c": 0.5 });
        assert_eq!(value.to_json(), json!({"a": 1, "b": [true, "x"], "c": 0.5}));
        assert_eq!(Value::F64(f64::INFINITY).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_display_is_compact_json() {
        let value = Value::Document(doc!{ "z": "A\"B" });
        assert_eq!(value.to_string(), r#"{"z":"A\"B"}"#);
    }

    #[test]
    fn test_debug_string() {
        let value = Value::Array(vec![Value::I64(1), Value::from("a")]);
        assert_eq!(format!("{:?}", value), "array([i64(1), string(\"a\")])");
    }
}
