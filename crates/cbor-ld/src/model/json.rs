//! Conversions between [`Value`] and `serde_json::Value`.
//!
//! JSON → `Value` is total: integral JSON numbers become integers, all other
//! numbers become floats and objects keep their member order. `Value` → JSON
//! fails for byte strings, non-finite floats and integers below `i64::MIN`;
//! undefined becomes null and map keys are rendered with [`key_string`].

use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::error::ConversionError;
use crate::model::Value;

impl From<&Json> for Value {
    fn from(json: &Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => number_to_value(n),
            Json::String(s) => Value::Text(s.clone()),
            Json::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Json::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        Value::from(&json)
    }
}

impl TryFrom<&Value> for Json {
    type Error = ConversionError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null | Value::Undefined => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(*b)),
            Value::Integer(n) => integer_to_json(*n),
            Value::Float(f) => Number::from_f64(*f)
                .map(Json::Number)
                .ok_or(ConversionError::NonFiniteFloat),
            Value::Text(s) => Ok(Json::String(s.clone())),
            Value::Bytes(_) => Err(ConversionError::BytesNotRepresentable),
            Value::Array(items) => items
                .iter()
                .map(Json::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Value::Object(members) => {
                let mut out = JsonMap::with_capacity(members.len());
                for (k, v) in members {
                    out.insert(k.clone(), Json::try_from(v)?);
                }
                Ok(Json::Object(out))
            }
            Value::Map(pairs) => {
                let mut out = JsonMap::with_capacity(pairs.len());
                for (k, v) in pairs {
                    out.insert(key_string(k), Json::try_from(v)?);
                }
                Ok(Json::Object(out))
            }
        }
    }
}

impl TryFrom<Value> for Json {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Json::try_from(&value)
    }
}

/// Renders a mapping key as the text key of a plain keyed structure.
///
/// Text is used as-is and integers use their decimal form. Any other key is
/// rendered as its JSON text; byte strings render as arrays of numbers.
pub fn key_string(key: &Value) -> String {
    match key {
        Value::Text(s) => s.clone(),
        Value::Integer(n) => n.to_string(),
        Value::Undefined => "undefined".to_string(),
        other => to_json_lossy(other).to_string(),
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(u) = n.as_u64() {
        Value::Integer(u as i128)
    } else if let Some(i) = n.as_i64() {
        Value::Integer(i as i128)
    } else {
        // Without arbitrary precision every JSON number fits an f64
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn integer_to_json(n: i128) -> Result<Json, ConversionError> {
    if let Ok(i) = i64::try_from(n) {
        Ok(Json::Number(i.into()))
    } else if let Ok(u) = u64::try_from(n) {
        Ok(Json::Number(u.into()))
    } else {
        Err(ConversionError::IntegerOutOfRange { value: n })
    }
}

fn to_json_lossy(value: &Value) -> Json {
    match value {
        Value::Null | Value::Undefined => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Integer(n) => integer_to_json(*n).unwrap_or_else(|_| Json::String(n.to_string())),
        Value::Float(f) => Number::from_f64(*f).map(Json::Number).unwrap_or(Json::Null),
        Value::Text(s) => Json::String(s.clone()),
        Value::Bytes(b) => Json::Array(b.iter().map(|x| Json::Number((*x).into())).collect()),
        Value::Array(items) => Json::Array(items.iter().map(to_json_lossy).collect()),
        Value::Object(members) => Json::Object(
            members
                .iter()
                .map(|(k, v)| (k.clone(), to_json_lossy(v)))
                .collect(),
        ),
        Value::Map(pairs) => Json::Object(
            pairs
                .iter()
                .map(|(k, v)| (key_string(k), to_json_lossy(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_numbers() {
        assert_eq!(Value::from(json!(7)), Value::Integer(7));
        assert_eq!(Value::from(json!(-7)), Value::Integer(-7));
        assert_eq!(Value::from(json!(u64::MAX)), Value::Integer(u64::MAX as i128));
        assert_eq!(Value::from(json!(1.25)), Value::Float(1.25));
    }

    #[test]
    fn test_json_object_order_preserved() {
        let value = Value::from(json!({ "b": 1, "a": 2 }));
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_back_to_json() {
        let doc = json!({ "name": "Alice", "tags": ["a", 1, null], "nested": { "x": 0.5 } });
        let value = Value::from(&doc);
        assert_eq!(Json::try_from(&value).unwrap(), doc);
    }

    #[test]
    fn test_unrepresentable_values() {
        assert_eq!(
            Json::try_from(Value::Bytes(vec![1])),
            Err(ConversionError::BytesNotRepresentable)
        );
        assert_eq!(
            Json::try_from(Value::Float(f64::INFINITY)),
            Err(ConversionError::NonFiniteFloat)
        );
        assert!(matches!(
            Json::try_from(Value::Integer(i64::MIN as i128 - 1)),
            Err(ConversionError::IntegerOutOfRange { .. })
        ));
        assert_eq!(Json::try_from(Value::Undefined).unwrap(), Json::Null);
    }

    #[test]
    fn test_key_string() {
        assert_eq!(key_string(&Value::Integer(42)), "42");
        assert_eq!(key_string(&Value::from("k")), "k");
        assert_eq!(key_string(&Value::Bool(true)), "true");
        assert_eq!(key_string(&Value::Null), "null");
        assert_eq!(key_string(&Value::Array(vec![Value::Integer(1)])), "[1]");
    }
}
