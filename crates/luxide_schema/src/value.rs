//! Dynamic value tree for form-side documents
//!
//! The editing form works on an untyped view of the render config. A
//! [`Value`] mirrors JSON exactly, with object keys kept in insertion
//! order so that walks over the document are deterministic.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Ordered string-keyed map used for object values
pub type Map = IndexMap<String, Value>;

/// A dynamic value that can represent any part of a render config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Null/absent value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Object/map of values
    Object(Map),
}

impl Value {
    /// Create an empty object
    pub fn object() -> Self {
        Self::Object(Map::new())
    }

    /// Convert any serializable type into a dynamic value
    pub fn from_typed<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(value)?)
    }

    /// Convert this value into a typed one
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }

    /// Parse from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value is record-shaped (an object)
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Short name of the value's case, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64. Floats only convert when they are whole numbers.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as a three-component vector
    pub fn as_vec3(&self) -> Option<[f64; 3]> {
        match self {
            Self::Array(arr) if arr.len() == 3 => Some([
                arr[0].as_float()?,
                arr[1].as_float()?,
                arr[2].as_float()?,
            ]),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Try to get as object
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Try to get as mutable object
    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get a field from an object value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Get a mutable field from an object value
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.as_object_mut()?.get_mut(key)
    }

    /// Set a field on an object value. Returns `None` if this is not an object.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<()> {
        self.as_object_mut()?.insert(key.into(), value);
        Some(())
    }

    /// Render as compact JSON text
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "null".to_string())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<[f64; 3]> for Value {
    fn from(v: [f64; 3]) -> Self {
        Self::Array(v.iter().map(|c| Self::Float(*c)).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map: Map = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::from(42).as_int(), Some(42));
        assert_eq!(Value::from(2.5).as_float(), Some(2.5));
        assert_eq!(Value::from(2.5).as_int(), None);
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert!(Value::object().is_record());
        assert!(!Value::from(vec![Value::from(1)]).is_record());
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let obj: Value = [("z", Value::from(1)), ("a", Value::from(2)), ("m", Value::from(3))]
            .into_iter()
            .collect();

        let keys: Vec<&str> = obj.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(obj.to_json(), r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn test_json_numbers_keep_their_case() {
        let v = Value::from_json(r#"{"n": 5, "x": 0.73, "s": "Black", "b": true, "none": null}"#)
            .unwrap();
        assert_eq!(v.get("n"), Some(&Value::Int(5)));
        assert_eq!(v.get("x"), Some(&Value::Float(0.73)));
        assert_eq!(v.get("s").and_then(Value::as_str), Some("Black"));
        assert_eq!(v.get("b").and_then(Value::as_bool), Some(true));
        assert!(v.get("none").unwrap().is_null());
    }

    #[test]
    fn test_typed_bridge() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Probe {
            color: [f64; 3],
            name: String,
        }

        let probe = Probe {
            color: [0.5, 0.25, 1.0],
            name: "probe".to_string(),
        };
        let value = Value::from_typed(&probe).unwrap();
        assert_eq!(value.get("color").and_then(Value::as_vec3), Some([0.5, 0.25, 1.0]));

        let back: Probe = value.to_typed().unwrap();
        assert_eq!(back, probe);
    }
}
