// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Deterministic canonical encoding of loosely-typed payloads.
//!
//! A payload is first *cleaned* (nulls, empty strings and containers that
//! end up empty are elided, sequences are compacted) and then rendered as
//! compact JSON text with every mapping's keys emitted in byte order. The
//! output depends only on the logical content of the payload, never on the
//! insertion order of the source map.

use core::fmt;

use serde_json::{Map, Number, Value};

use crate::config::{DECIMAL_POINT_MAX, DECIMAL_POINT_MIN};
use crate::error::{KernelError, KernelResult};

/// The unique serialization of a cleaned payload tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalForm(String);

impl CanonicalForm {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalForm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize a payload whose root must be a mapping.
///
/// Fails with [`KernelError::NonMappingRoot`] when the cleaned root is a
/// scalar, a sequence or was elided entirely. Callers treat that as a broken
/// invariant, not as a digest mismatch.
pub fn canonicalize(value: &Value) -> KernelResult<CanonicalForm> {
    match clean(value) {
        Value::Object(map) => {
            let mut out = String::new();
            write_object(&map, &mut out)?;
            Ok(CanonicalForm(out))
        }
        other => Err(KernelError::NonMappingRoot {
            found: kind_name(&other),
        }),
    }
}

/// Return the cleaned tree that [`canonicalize`] serializes.
///
/// Elided values come back as `Value::Null`.
pub fn clean(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(clean_object(map)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(clean)
                .filter(|item| !is_elided(item))
                .collect(),
        ),
        Value::String(s) if s.is_empty() => Value::Null,
        scalar => scalar.clone(),
    }
}

fn clean_object(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter_map(|(key, value)| {
            let cleaned = clean(value);
            (!is_elided(&cleaned)).then(|| (key.clone(), cleaned))
        })
        .collect()
}

fn is_elided(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn write_value(value: &Value, out: &mut String) -> KernelResult<()> {
    match value {
        Value::Object(map) => write_object(map, out)?,
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out)?;
            }
            out.push(']');
        }
        Value::Number(n) => write_number(n, out),
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}

fn write_object(map: &Map<String, Value>, out: &mut String) -> KernelResult<()> {
    // Key order is enforced here rather than inherited from the map type.
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&serde_json::to_string(key)?);
        out.push(':');
        write_value(value, out)?;
    }
    out.push('}');
    Ok(())
}

/// Floats render the way JavaScript prints numbers, since that is how the
/// writers of the chain serialized payloads: shortest round-trip digits,
/// plain decimal for `1e-6 <= |x| < 1e21`, `e+N`/`e-N` exponents otherwise.
/// Integers render verbatim.
fn write_number(n: &Number, out: &mut String) {
    match n.as_f64() {
        Some(f) if n.is_f64() => write_float(f, out),
        _ => out.push_str(&n.to_string()),
    }
}

fn write_float(f: f64, out: &mut String) {
    if f == 0.0 || !f.is_finite() {
        // JSON has no NaN/Infinity; serde_json never yields them.
        out.push('0');
        return;
    }
    if f < 0.0 {
        out.push('-');
    }

    // `{:e}` gives the shortest round-trip digits, e.g. "1.2345e-7".
    let sci = format!("{:e}", f.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Value is 0.<digits> x 10^n.
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    if k <= n && n <= DECIMAL_POINT_MAX {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= DECIMAL_POINT_MAX {
        let (int_part, frac_part) = digits.split_at(n as usize);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    } else if DECIMAL_POINT_MIN < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n) as usize));
        out.push_str(&digits);
    } else {
        let (lead, rest) = digits.split_at(1);
        out.push_str(lead);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('e');
        out.push(if n - 1 >= 0 { '+' } else { '-' });
        out.push_str(&(n - 1).abs().to_string());
    }
}
