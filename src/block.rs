// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Block entity and assembly from raw store records.
//!
//! Raw records come from a schema-less store. A malformed field never aborts
//! an audit: each field has a fixed default that is substituted instead, and
//! the damage shows up later as a hash or link mismatch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record of the audited chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the logical chain.
    pub index: i64,
    /// Creation time. Opaque to verification, hashed as a raw integer.
    pub timestamp: i64,
    /// Attested payload. Always a mapping when produced by [`assemble`].
    pub data: Value,
    /// Stored digest of the preceding block.
    pub previous_hash: String,
    /// Stored digest of this block.
    pub hash: String,
}

/// Every numeric representation a store may hand back for an integer field.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NumericRepr<'a> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Decimal(&'a str),
    /// Extended-JSON wrapper such as `{"$numberLong": "42"}`.
    Wrapped(&'a Value),
    Unsupported,
}

const EXTENDED_NUMBER_KEYS: [&str; 3] = ["$numberInt", "$numberLong", "$numberDouble"];

impl<'a> From<&'a Value> for NumericRepr<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    NumericRepr::Signed(i)
                } else if let Some(u) = n.as_u64() {
                    NumericRepr::Unsigned(u)
                } else {
                    n.as_f64().map_or(NumericRepr::Unsupported, NumericRepr::Float)
                }
            }
            Value::String(s) => NumericRepr::Decimal(s),
            Value::Object(map) if map.len() == 1 => EXTENDED_NUMBER_KEYS
                .iter()
                .find_map(|key| map.get(*key))
                .map_or(NumericRepr::Unsupported, NumericRepr::Wrapped),
            _ => NumericRepr::Unsupported,
        }
    }
}

impl NumericRepr<'_> {
    /// Floats truncate toward zero, unparsable text becomes zero.
    fn to_i64(self) -> i64 {
        match self {
            NumericRepr::Signed(i) => i,
            NumericRepr::Unsigned(u) => i64::try_from(u).unwrap_or(i64::MAX),
            NumericRepr::Float(f) => f as i64,
            NumericRepr::Decimal(s) => s.parse::<i64>().unwrap_or(0),
            NumericRepr::Wrapped(inner) => match inner {
                // $numberDouble carries float text, e.g. "1.5" or "NaN".
                Value::String(s) => s
                    .parse::<i64>()
                    .or_else(|_| s.parse::<f64>().map(|f| f as i64))
                    .unwrap_or(0),
                other => NumericRepr::from(other).to_i64(),
            },
            NumericRepr::Unsupported => 0,
        }
    }
}

fn integer_field(record: &Map<String, Value>, key: &str) -> i64 {
    match record.get(key) {
        Some(value) => {
            let repr = NumericRepr::from(value);
            if repr == NumericRepr::Unsupported {
                tracing::debug!(field = key, "unsupported numeric representation, defaulting to 0");
            }
            repr.to_i64()
        }
        None => {
            tracing::debug!(field = key, "field absent, defaulting to 0");
            0
        }
    }
}

fn string_field(record: &Map<String, Value>, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        other => {
            tracing::debug!(field = key, present = other.is_some(), "non-string field, defaulting to empty");
            String::new()
        }
    }
}

fn data_field(record: &Map<String, Value>) -> Value {
    match record.get("data") {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        other => {
            tracing::debug!(present = other.is_some(), "payload is not a mapping, defaulting to empty");
            Value::Object(Map::new())
        }
    }
}

/// Normalizes one raw record. Unknown keys are ignored; a record that is not
/// a mapping at all yields a block made entirely of defaults.
pub fn assemble_record(raw: &Value) -> Block {
    let empty = Map::new();
    let record = match raw {
        Value::Object(map) => map,
        _ => {
            tracing::debug!("raw record is not a mapping, using defaults for every field");
            &empty
        }
    };

    Block {
        index: integer_field(record, "index"),
        timestamp: integer_field(record, "timestamp"),
        data: data_field(record),
        previous_hash: string_field(record, "previousHash"),
        hash: string_field(record, "hash"),
    }
}

/// Normalizes raw records and restores ascending `index` order.
///
/// The sort is stable, so records sharing an index keep their store order.
pub fn assemble(raw_records: &[Value]) -> Vec<Block> {
    let mut blocks: Vec<Block> = raw_records.iter().map(assemble_record).collect();
    blocks.sort_by_key(|block| block.index);
    blocks
}
