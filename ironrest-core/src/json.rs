//! Compact JSON text form.
//!
//! [`Value`] implements `serde::Serialize` and `serde::Deserialize` so that
//! `serde_json` renders and parses the compact form directly. Map keys keep
//! their insertion order in both directions.

use crate::error::Result;
use crate::value::{Bytes, Value};
use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i32(*i),
            Self::Long(l) => serializer.serialize_i64(*l),
            Self::Float(f) => serializer.serialize_f32(*f),
            Self::Double(d) => serializer.serialize_f64(*d),
            Self::String(s) => serializer.serialize_str(s),
            Self::Bytes(b) => serializer.serialize_str(&b.to_wire_string()),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-null JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Long(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Double(v as f64), Value::Long))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Double(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Err(E::custom("null is not a valid value; omit the field instead"))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value, A::Error> {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            entries.insert(key, value);
        }
        Ok(Value::Map(entries))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire_string())
    }
}

/// Renders a value in compact JSON.
///
/// # Errors
/// Returns `CodecError::Json` if serialization fails.
pub fn encode(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Parses compact (or pretty) JSON into a value.
///
/// # Errors
/// Returns `CodecError::Json` if the text is not valid JSON or contains `null`.
pub fn decode(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_keeps_key_order() {
        let mut entries = IndexMap::new();
        entries.insert("zeta".to_string(), Value::Int(1));
        entries.insert("alpha".to_string(), Value::from("a"));
        let text = encode(&Value::Map(entries)).expect("Failed to encode");
        assert_eq!(text, r#"{"zeta":1,"alpha":"a"}"#);
    }

    #[test]
    fn test_decode_nested() {
        let value = decode(r#"{"list":[1,2.5,"x"],"flag":true}"#).expect("Failed to decode");
        let map = value.as_map().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["list", "flag"]);
        assert_eq!(
            map["list"],
            Value::Array(vec![Value::Long(1), Value::Double(2.5), Value::from("x")])
        );
        assert_eq!(map["flag"], Value::Bool(true));
    }

    #[test]
    fn test_decode_rejects_null() {
        assert!(decode(r#"{"a":null}"#).is_err());
    }

    #[test]
    fn test_bytes_encode_as_string() {
        let text = encode(&Value::Bytes(Bytes::new(b"hi".to_vec()))).unwrap();
        assert_eq!(text, r#""hi""#);
    }
}
