//! Read-only provenance queries shared by every record store.

use ernest_kernel::block::assemble_record;
use serde_json::Value;

use crate::error::{Result, StoreError};

/// A collection of raw block documents, in store order.
pub trait ProvenanceStore {
    /// Every stored document, unfiltered.
    fn records(&self) -> Result<Vec<Value>>;

    fn count(&self) -> Result<usize> {
        Ok(self.records()?.len())
    }

    /// Highest chain position, `count - 1`. An empty store has height -1.
    fn height(&self) -> Result<i64> {
        Ok(self.count()? as i64 - 1)
    }

    fn get_all(&self, limit: usize, skip: usize) -> Result<Vec<Value>> {
        Ok(self.records()?.into_iter().skip(skip).take(limit).collect())
    }

    /// First document whose `index`, coerced the way the auditor coerces
    /// it, equals `index`.
    fn get_by_index(&self, index: i64) -> Result<Value> {
        self.records()?
            .into_iter()
            .find(|record| assemble_record(record).index == index)
            .ok_or_else(|| StoreError::NotFound(format!("index {}", index)))
    }

    fn get_by_hash(&self, hash: &str) -> Result<Value> {
        self.records()?
            .into_iter()
            .find(|record| record.get("hash").and_then(Value::as_str) == Some(hash))
            .ok_or_else(|| StoreError::NotFound(format!("hash {}", hash)))
    }
}
