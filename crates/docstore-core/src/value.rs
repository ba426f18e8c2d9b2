//! The vendor-neutral document value model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ConnectorError;

/// A document attribute value.
///
/// A closed recursive sum type: strings, numbers (f64 semantics), booleans,
/// lists, and maps. There is no null/undefined variant; an absent value is an
/// error, not a representable state. Maps use [`BTreeMap`] so iteration order
/// is deterministic, which downstream code relies on for reproducible
/// expression text and canonical cursor serialization.
///
/// Serde uses the untagged (plain JSON) representation, so a value round-trips
/// through ordinary JSON text: `{"a": 1, "b": ["yo"]}`. Whole numbers
/// serialize as JSON integers (`100`, not `100.0`) so serialized text is
/// canonical for values that came in as integers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// UTF-8 string.
    String(String),
    /// Number with f64 semantics.
    Number(f64),
    /// Boolean.
    Bool(bool),
    /// Ordered list of values.
    List(Vec<Value>),
    /// String-keyed map of values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create a number value.
    #[must_use]
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// Create a map value from key/value pairs.
    pub fn map<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the string if this is a `String` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a `Number` value.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the map if this is a `Map` value.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Number(n) => {
                #[allow(clippy::cast_possible_truncation)]
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 9_007_199_254_740_992.0 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::List(items) => items.serialize(serializer),
            Value::Map(entries) => entries.serialize(serializer),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ConnectorError;

    /// Convert parsed JSON into a document value.
    ///
    /// JSON `null` has no counterpart in the document model and fails with
    /// [`ConnectorError::UnsupportedValueType`].
    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Null => {
                Err(ConnectorError::UnsupportedValueType("null".to_owned()))
            }
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).ok_or_else(|| {
                ConnectorError::UnsupportedValueType(n.to_string())
            }),
            serde_json::Value::String(s) => Ok(Value::String(s)),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            serde_json::Value::Object(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                .collect::<Result<BTreeMap<_, _>, ConnectorError>>()
                .map(Value::Map),
        }
    }
}
