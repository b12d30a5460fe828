//! URL-safe (ROR2) text form.
//!
//! Grammar:
//! - map: `(key:value,key:value)`, empty map `()`
//! - array: `List(value,value)`, empty array `List()`
//! - empty string: `''`
//! - any other scalar: its text with every byte outside `[A-Za-z0-9-_.~]`
//!   percent-encoded
//!
//! Scalars decode as [`Value::String`]; the typed readers on [`Value`] parse
//! numbers and booleans out of them.

use crate::error::{CodecError, Result};
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt::Write;

const LIST_PREFIX: &str = "List(";
const EMPTY_STRING: &str = "''";

/// Renders a value in the URL-safe form.
#[must_use]
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Long(l) => {
            let _ = write!(out, "{l}");
        }
        Value::Float(f) => escape_into(out, &f.to_string()),
        Value::Double(d) => escape_into(out, &d.to_string()),
        Value::String(s) => escape_into(out, s),
        Value::Bytes(b) => escape_into(out, &b.to_wire_string()),
        Value::Array(items) => {
            out.push_str(LIST_PREFIX);
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(')');
        }
        Value::Map(entries) => {
            out.push('(');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                escape_into(out, key);
                out.push(':');
                write_value(out, item);
            }
            out.push(')');
        }
    }
}

fn escape_into(out: &mut String, s: &str) {
    if s.is_empty() {
        out.push_str(EMPTY_STRING);
        return;
    }
    for &b in s.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
}

/// Parses the URL-safe form into a value.
///
/// # Errors
/// Returns `CodecError::Ror2Syntax` on malformed input.
pub fn decode(text: &str) -> Result<Value> {
    let mut parser = Parser {
        input: text.as_bytes(),
        pos: 0,
    };
    let value = parser.parse_value()?;
    if parser.pos != parser.input.len() {
        return Err(parser.error("trailing characters"));
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> CodecError {
        CodecError::Ror2Syntax {
            position: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn rest_starts_with(&self, prefix: &str) -> bool {
        self.input[self.pos..].starts_with(prefix.as_bytes())
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", char::from(byte))))
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        if self.rest_starts_with(LIST_PREFIX) {
            self.pos += LIST_PREFIX.len();
            return self.parse_list();
        }
        if self.peek() == Some(b'(') {
            self.pos += 1;
            return self.parse_map();
        }
        self.parse_scalar().map(Value::String)
    }

    fn parse_list(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.parse_value()?);
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                _ => return Err(self.error("expected ',' or ')' in list")),
            }
        }
    }

    fn parse_map(&mut self) -> Result<Value> {
        let mut entries = IndexMap::new();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(Value::Map(entries));
        }
        loop {
            let key = self.parse_scalar()?;
            self.expect(b':')?;
            let value = self.parse_value()?;
            entries.insert(key, value);
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Value::Map(entries));
                }
                _ => return Err(self.error("expected ',' or ')' in map")),
            }
        }
    }

    fn parse_scalar(&mut self) -> Result<String> {
        if self.rest_starts_with(EMPTY_STRING) {
            self.pos += EMPTY_STRING.len();
            return Ok(String::new());
        }
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b',' | b'(' | b')' | b':' | b'\'') {
                break;
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a value"));
        }
        self.unescape(start, self.pos)
    }

    fn unescape(&self, start: usize, end: usize) -> Result<String> {
        let raw = &self.input[start..end];
        let mut bytes = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'%' {
                let hex = raw
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| CodecError::Ror2Syntax {
                        position: start + i,
                        message: "invalid percent escape".to_string(),
                    })?;
                bytes.push(hex);
                i += 3;
            } else {
                bytes.push(raw[i]);
                i += 1;
            }
        }
        String::from_utf8(bytes).map_err(|_| CodecError::Ror2Syntax {
            position: start,
            message: "escaped text is not UTF-8".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_encode_record() {
        let value = map(&[
            ("name", Value::from("a b")),
            ("tags", Value::Array(vec![Value::from("x"), Value::Int(2)])),
            ("empty", Value::from("")),
        ]);
        assert_eq!(encode(&value), "(name:a%20b,tags:List(x,2),empty:'')");
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        assert_eq!(encode(&Value::from("(a:b,c)'%")), "%28a%3Ab%2Cc%29%27%25");
    }

    #[test]
    fn test_decode_nested() {
        let value = decode("(outer:(inner:List(1,'')),k%3A:v)").expect("Failed to decode");
        let expected = map(&[
            (
                "outer",
                map(&[(
                    "inner",
                    Value::Array(vec![Value::from("1"), Value::from("")]),
                )]),
            ),
            ("k:", Value::from("v")),
        ]);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_decode_empty_containers() {
        assert_eq!(decode("()").unwrap(), Value::empty_map());
        assert_eq!(decode("List()").unwrap(), Value::Array(Vec::new()));
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode("(a:1"),
            Err(CodecError::Ror2Syntax { .. })
        ));
        assert!(decode("(a:1))").is_err());
        assert!(decode("%zz").is_err());
        assert!(decode("(a1)").is_err());
    }

    #[test]
    fn test_unicode_round_trip() {
        let value = Value::from("héllo wörld");
        assert_eq!(decode(&encode(&value)).unwrap(), value);
    }
}
