//! Canonical JSON encoding for content addressing.
//!
//! This module renders a structured value as exactly one string:
//! - Object keys sorted by UTF-16 code units (the order JSON tooling sorts in)
//! - No insignificant whitespace
//! - Arrays keep their order
//! - Doubles in shortest round-trip form, integral doubles without a fraction
//! - Integers beyond 2^53 - 1 rendered as quoted decimal strings
//!
//! The canonical string is the hash preimage of every identifier, so any change
//! to this encoding changes every address in the registry.

use ciborium::value::{Integer, Value};
use serde::Serialize;

use crate::error::{CoreError, Result};

/// Largest integer that survives a round-trip through an IEEE-754 double.
pub const MAX_SAFE_INTEGER: i128 = (1 << 53) - 1;

/// Canonicalize a generic value.
pub fn canonicalize(value: &Value) -> Result<String> {
    let mut buf = String::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

/// Canonicalize a JSON document.
pub fn canonicalize_json(value: &serde_json::Value) -> Result<String> {
    canonicalize(&json_to_value(value))
}

/// Canonicalize any serializable type.
///
/// Structs become objects keyed by their serialized field names, so the
/// result matches what [`canonicalize_json`] produces for the same data.
pub fn to_canonical_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let value = Value::serialized(value).map_err(|e| CoreError::Encoding(e.to_string()))?;
    canonicalize(&value)
}

/// Lift a JSON document into the generic value model.
pub fn json_to_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Integer(u.into())
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::Text(s.clone()),
        serde_json::Value::Array(arr) => Value::Array(arr.iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (Value::Text(k.clone()), json_to_value(v)))
                .collect(),
        ),
    }
}

/// Recursively encode a value.
fn encode_value_to(buf: &mut String, value: &Value) -> Result<()> {
    match value {
        Value::Null => buf.push_str("null"),
        Value::Bool(b) => buf.push_str(if *b { "true" } else { "false" }),
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Float(f) => encode_float(buf, *f)?,
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr)?,
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Bytes(_) => {
            return Err(CoreError::UnsupportedValue("byte string".into()));
        }
        Value::Tag(tag, _) => {
            return Err(CoreError::UnsupportedValue(format!("tagged value ({tag})")));
        }
        _ => {
            return Err(CoreError::UnsupportedValue("unknown value kind".into()));
        }
    }
    Ok(())
}

/// Integers within the safe range are bare; larger magnitudes are quoted.
fn encode_integer(buf: &mut String, i: Integer) {
    let n: i128 = i.into();
    if n.abs() <= MAX_SAFE_INTEGER {
        buf.push_str(&n.to_string());
    } else {
        buf.push('"');
        buf.push_str(&n.to_string());
        buf.push('"');
    }
}

fn encode_float(buf: &mut String, f: f64) -> Result<()> {
    if !f.is_finite() {
        return Err(CoreError::UnsupportedValue(format!("non-finite number {f}")));
    }
    buf.push_str(&format_number(f));
    Ok(())
}

/// Render a finite double in the ECMAScript `Number::toString` form.
///
/// `1.0` renders as `1`, `1e21` as `1e+21`, `1e-7` as `1e-7`, `0.5` as `0.5`.
pub fn format_number(f: f64) -> String {
    if f == 0.0 {
        return "0".into();
    }
    let sign = if f < 0.0 { "-" } else { "" };

    // LowerExp yields the shortest round-trip digits: "1.2345e-7".
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let e = n - 1;
        let exp_sign = if e >= 0 { "+" } else { "-" };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{lead}e{exp_sign}{}", e.abs())
        } else {
            format!("{lead}.{rest}e{exp_sign}{}", e.abs())
        }
    };
    format!("{sign}{body}")
}

/// Encode a JSON string literal.
fn encode_text(buf: &mut String, s: &str) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\u{08}' => buf.push_str("\\b"),
            '\u{0c}' => buf.push_str("\\f"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            c if (c as u32) < 0x20 => buf.push_str(&format!("\\u{:04x}", c as u32)),
            c => buf.push(c),
        }
    }
    buf.push('"');
}

fn encode_array(buf: &mut String, arr: &[Value]) -> Result<()> {
    buf.push('[');
    for (i, item) in arr.iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        encode_value_to(buf, item)?;
    }
    buf.push(']');
    Ok(())
}

/// Encode a map canonically.
///
/// Keys must be text and unique. They are ordered by UTF-16 code units, which
/// differs from byte order only for characters outside the BMP.
fn encode_map_canonical(buf: &mut String, entries: &[(Value, Value)]) -> Result<()> {
    let mut pairs: Vec<(&str, &Value)> = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        match k {
            Value::Text(key) => pairs.push((key.as_str(), v)),
            _ => return Err(CoreError::UnsupportedValue("non-text map key".into())),
        }
    }

    pairs.sort_by(|a, b| a.0.encode_utf16().cmp(b.0.encode_utf16()));

    if let Some(dup) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(CoreError::DuplicateKey(dup[0].0.to_string()));
    }

    buf.push('{');
    for (i, (key, value)) in pairs.into_iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        encode_text(buf, key);
        buf.push(':');
        encode_value_to(buf, value)?;
    }
    buf.push('}');
    Ok(())
}
