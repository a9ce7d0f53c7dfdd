use anyhow::Context;
use serde_json::Value;
use std::path::Path;

use ernest_store::{JsonFileSource, ProvenanceStore};

pub fn by_index(blocks_path: &Path, index: i64) -> anyhow::Result<Value> {
    let record = JsonFileSource::new(blocks_path)
        .get_by_index(index)
        .context("Error getting block")?;
    print_record(&record)?;
    Ok(record)
}

pub fn by_hash(blocks_path: &Path, hash: &str) -> anyhow::Result<Value> {
    let record = JsonFileSource::new(blocks_path)
        .get_by_hash(hash)
        .context("Error getting block")?;
    print_record(&record)?;
    Ok(record)
}

fn print_record(record: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}
