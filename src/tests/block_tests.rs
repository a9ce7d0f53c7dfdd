// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde_json::{json, Value};

use crate::block::{assemble, assemble_record};

#[test]
fn test_well_formed_record() {
    let block = assemble_record(&json!({
        "_id": "65f0",
        "index": 4,
        "timestamp": 1_700_000_004,
        "data": { "type": "inference" },
        "previousHash": "aa",
        "hash": "bb",
        "createdAt": "2024-01-01T00:00:00Z",
    }));
    assert_eq!(block.index, 4);
    assert_eq!(block.timestamp, 1_700_000_004);
    assert_eq!(block.data, json!({ "type": "inference" }));
    assert_eq!(block.previous_hash, "aa");
    assert_eq!(block.hash, "bb");
}

#[test]
fn test_numeric_coercion() {
    let cases: [(Value, i64); 10] = [
        (json!(12), 12),
        (json!(-3), -3),
        (json!(9.99), 9),
        (json!(-9.99), -9),
        (json!("42"), 42),
        (json!("4x2"), 0),
        (json!("1.5"), 0),
        (json!(true), 0),
        (json!(null), 0),
        (json!(u64::MAX), i64::MAX),
    ];
    for (raw, expected) in cases {
        let block = assemble_record(&json!({ "index": raw.clone(), "timestamp": raw }));
        assert_eq!(block.index, expected, "index from {raw}");
        assert_eq!(block.timestamp, expected, "timestamp from {raw}");
    }
}

#[test]
fn test_extended_json_numbers() {
    let block = assemble_record(&json!({
        "index": { "$numberInt": "7" },
        "timestamp": { "$numberLong": "1700000000123" },
    }));
    assert_eq!(block.index, 7);
    assert_eq!(block.timestamp, 1_700_000_000_123);

    let block = assemble_record(&json!({
        "index": { "$numberDouble": "3.75" },
        "timestamp": { "$date": "2024-01-01T00:00:00Z" },
    }));
    assert_eq!(block.index, 3);
    assert_eq!(block.timestamp, 0);
}

#[test]
fn test_missing_and_mistyped_fields_default() {
    let block = assemble_record(&json!({
        "data": ["not", "a", "map"],
        "previousHash": 17,
    }));
    assert_eq!(block.index, 0);
    assert_eq!(block.timestamp, 0);
    assert_eq!(block.data, json!({}));
    assert_eq!(block.previous_hash, "");
    assert_eq!(block.hash, "");
}

#[test]
fn test_non_mapping_record_defaults() {
    let block = assemble_record(&json!("garbage"));
    assert_eq!(block.index, 0);
    assert_eq!(block.data, json!({}));
    assert_eq!(block.hash, "");
}

#[test]
fn test_sorted_by_index() {
    let raw = vec![
        json!({ "index": 2, "hash": "c" }),
        json!({ "index": "0", "hash": "a" }),
        json!({ "index": 1.0, "hash": "b" }),
    ];
    let blocks = assemble(&raw);
    let order: Vec<&str> = blocks.iter().map(|b| b.hash.as_str()).collect();
    assert_eq!(order, ["a", "b", "c"]);
}

#[test]
fn test_sort_is_stable_for_duplicate_indices() {
    let raw = vec![
        json!({ "index": 1, "hash": "first" }),
        json!({ "index": 0, "hash": "genesis" }),
        json!({ "index": 1, "hash": "second" }),
    ];
    let blocks = assemble(&raw);
    let order: Vec<&str> = blocks.iter().map(|b| b.hash.as_str()).collect();
    assert_eq!(order, ["genesis", "first", "second"]);
}

#[test]
fn test_empty_input() {
    assert!(assemble(&[]).is_empty());
}
