//! The structured value model shared by the codec and its callers.

use indexmap::IndexMap;

/// A plain keyed structure: text keys in encounter order.
pub type Object = IndexMap<String, Value>;

/// Smallest integer the codec can represent (-2^64).
pub const MIN_INTEGER: i128 = -(1i128 << 64);

/// Largest integer the codec can represent (2^64 - 1).
pub const MAX_INTEGER: i128 = u64::MAX as i128;

/// A value that can be encoded to and decoded from the binary format.
///
/// Two mapping shapes exist. [`Value::Object`] is a plain keyed structure
/// with text keys; [`Value::Map`] is an order-preserving key/value container
/// whose keys may be any value. The decoder produces one or the other
/// depending on [`MapOutput`](crate::codec::MapOutput).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The null literal.
    #[default]
    Null,
    /// The undefined literal.
    Undefined,
    /// Boolean literal.
    Bool(bool),
    /// Integer in `MIN_INTEGER..=MAX_INTEGER`.
    Integer(i128),
    /// Double-precision float.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw byte blob.
    Bytes(Vec<u8>),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Plain keyed structure.
    Object(Object),
    /// Order-preserving key/value container.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Returns a short name for the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up a text key in an object, or in a map with text keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(o) => o.get(key),
            Value::Map(pairs) => pairs
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i128)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v as i128)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Integer(v as i128)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
