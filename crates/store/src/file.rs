//! Block records exported to disk.
//!
//! Two layouts are accepted: a single JSON array of documents, or one
//! document per line (the default of `mongoexport`). Blank lines are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use ernest_kernel::source::BlockSource;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::query::ProvenanceStore;

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parses the export. Every document must be a JSON object.
pub fn parse_records(text: &str) -> Result<Vec<Value>> {
    if text.trim_start().starts_with('[') {
        let records: Vec<Value> =
            serde_json::from_str(text).map_err(|source| StoreError::Parse { line: source.line(), source })?;
        for (i, record) in records.iter().enumerate() {
            ensure_document(record, || format!("array element {}", i))?;
        }
        return Ok(records);
    }

    let mut records = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let record: Value =
            serde_json::from_str(line).map_err(|source| StoreError::Parse { line: line_no, source })?;
        ensure_document(&record, || format!("line {}", line_no))?;
        records.push(record);
    }
    Ok(records)
}

fn ensure_document(record: &Value, location: impl FnOnce() -> String) -> Result<()> {
    if record.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidFormat(format!("{} is not a JSON object", location())))
    }
}

impl ProvenanceStore for JsonFileSource {
    fn records(&self) -> Result<Vec<Value>> {
        let text = fs::read_to_string(&self.path)?;
        let records = parse_records(&text)?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "loaded block export");
        Ok(records)
    }
}

impl BlockSource for JsonFileSource {
    type Error = StoreError;

    fn fetch(&self, limit: usize) -> Result<Vec<Value>> {
        self.get_all(limit, 0)
    }
}
