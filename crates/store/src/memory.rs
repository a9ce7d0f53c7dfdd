//! In-memory record store.

use std::convert::Infallible;

use ernest_kernel::source::BlockSource;
use serde_json::Value;

use crate::error::Result;
use crate::query::ProvenanceStore;

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Value>,
}

impl MemorySource {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: Value) {
        self.records.push(record);
    }
}

impl ProvenanceStore for MemorySource {
    fn records(&self) -> Result<Vec<Value>> {
        Ok(self.records.clone())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}

impl BlockSource for MemorySource {
    type Error = Infallible;

    fn fetch(&self, limit: usize) -> std::result::Result<Vec<Value>, Infallible> {
        Ok(self.records.iter().take(limit).cloned().collect())
    }
}
