use crate::error::Result;

use ernest_kernel::block::Block;
use ernest_kernel::hash::block_hash;
use serde_json::{json, Value};

use std::fs;
use std::path::{Path, PathBuf};

pub struct ChainPaths {
    pub valid: PathBuf,
    pub tampered: PathBuf,
    pub broken_link: PathBuf,
}

/// Builds `len` correctly linked blocks in the shape the provenance backend
/// writes them: genesis registration first, then inference records.
pub fn sealed_chain(len: usize) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::with_capacity(len);
    for i in 0..len {
        let data = if i == 0 {
            json!({
                "type": "model_registration",
                "modelId": "genesis",
                "metadata": { "description": "Genesis block" },
            })
        } else {
            json!({
                "type": "inference",
                "modelId": "iris-classifier",
                "version": "1.0.0",
                "inputHash": format!("{:064x}", i),
                "outputHash": format!("{:064x}", i * 31),
                "params": { "threshold": 0.5, "features": [5.1, 3.5, 1.4, 0.2] },
                "metadata": { "operator": null, "note": "" },
            })
        };
        let previous_hash = blocks.last().map(|b| b.hash.clone()).unwrap_or_else(|| "0".to_string());
        let mut block = Block {
            index: i as i64,
            timestamp: 1_700_000_000 + i as i64 * 60,
            data,
            previous_hash,
            hash: String::new(),
        };
        // A fixture payload is always a mapping.
        block.hash = block_hash(&block).unwrap_or_default();
        blocks.push(block);
    }
    blocks
}

/// Recomputes the stored hash of `block` over its current fields.
pub fn reseal(block: &mut Block) -> Result<()> {
    block.hash = block_hash(block)?;
    Ok(())
}

/// Raw store documents, including the bookkeeping fields a collection adds.
pub fn to_documents(blocks: &[Block]) -> Vec<Value> {
    blocks
        .iter()
        .map(|b| {
            json!({
                "_id": { "$oid": format!("{:024x}", b.index) },
                "index": b.index,
                "timestamp": b.timestamp,
                "data": b.data,
                "previousHash": b.previous_hash,
                "hash": b.hash,
                "__v": 0,
            })
        })
        .collect()
}

/// Writes one document per line, rotated so the store order is not the
/// chain order.
pub fn write_documents(path: &Path, documents: &[Value]) -> Result<()> {
    let mut rotated = documents.to_vec();
    let mid = rotated.len() / 2;
    rotated.rotate_left(mid);
    let mut text = String::new();
    for document in &rotated {
        text.push_str(&document.to_string());
        text.push('\n');
    }
    fs::write(path, text)?;
    Ok(())
}

/// Writes a valid chain, one with block `len / 2` payload-tampered and one
/// whose last block links to a foreign hash.
pub fn generate_chain_scenario(dir: &Path, len: usize) -> Result<ChainPaths> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let blocks = sealed_chain(len);

    let valid = dir.join("blocks.json");
    write_documents(&valid, &to_documents(&blocks))?;

    let mut tampered_blocks = blocks.clone();
    if let Some(block) = tampered_blocks.get_mut(len / 2) {
        block.data["modelId"] = json!("forged-model");
    }
    let tampered = dir.join("blocks_tampered.json");
    write_documents(&tampered, &to_documents(&tampered_blocks))?;

    let mut broken_blocks = blocks;
    if let Some(block) = broken_blocks.last_mut() {
        block.previous_hash = "f".repeat(64);
        reseal(block)?;
    }
    let broken_link = dir.join("blocks_broken_link.json");
    write_documents(&broken_link, &to_documents(&broken_blocks))?;

    Ok(ChainPaths {
        valid,
        tampered,
        broken_link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::file::JsonFileSource;
    use crate::query::ProvenanceStore;
    use ernest_kernel::{audit, verify_chain, ChainVerifier, FailureReason, KernelError};
    use tempfile::tempdir;

    #[test]
    fn test_sealed_chain_verifies() {
        assert!(verify_chain(&sealed_chain(8)).is_valid());
    }

    #[test]
    fn test_scenario_files() {
        let dir = tempdir().unwrap();
        let paths = generate_chain_scenario(dir.path(), 6).unwrap();
        let verifier = ChainVerifier::default();

        let outcome = audit(&JsonFileSource::new(&paths.valid), 100, &verifier).unwrap();
        assert!(outcome.is_valid());
        assert_eq!(outcome.total_blocks(), 6);

        let outcome = audit(&JsonFileSource::new(&paths.tampered), 100, &verifier).unwrap();
        assert_eq!(outcome.invalid_count(), 1);
        assert_eq!(outcome.failures()[0].position, 3);
        assert!(matches!(outcome.failures()[0].reason, FailureReason::HashMismatch { .. }));

        let outcome = audit(&JsonFileSource::new(&paths.broken_link), 100, &verifier).unwrap();
        assert_eq!(outcome.invalid_count(), 1);
        assert_eq!(outcome.failures()[0].position, 5);
        assert!(matches!(outcome.failures()[0].reason, FailureReason::LinkMismatch { .. }));
    }

    #[test]
    fn test_write_documents_rotates_store_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rotated.json");
        let documents: Vec<Value> = (0..4).map(|i| json!({ "index": i })).collect();
        write_documents(&path, &documents).unwrap();

        let stored = JsonFileSource::new(&path).records().unwrap();
        let order: Vec<i64> = stored.iter().map(|d| d["index"].as_i64().unwrap()).collect();
        assert_eq!(order, [2, 3, 0, 1]);

        let empty = dir.path().join("empty.json");
        write_documents(&empty, &[]).unwrap();
        assert!(JsonFileSource::new(&empty).records().unwrap().is_empty());
    }

    #[test]
    fn test_reseal_propagates_canonicalization_error() {
        let mut block = sealed_chain(1).remove(0);
        block.data = json!(["not", "a", "mapping"]);
        let stale = block.hash.clone();

        assert!(matches!(
            reseal(&mut block),
            Err(StoreError::Kernel(KernelError::NonMappingRoot { .. }))
        ));
        assert_eq!(block.hash, stale);

        block.data = json!({ "type": "inference" });
        reseal(&mut block).unwrap();
        assert_eq!(block.hash, block_hash(&block).unwrap());
    }

    #[test]
    fn test_scenario_queries() {
        let dir = tempdir().unwrap();
        let paths = generate_chain_scenario(dir.path(), 4).unwrap();
        let store = JsonFileSource::new(&paths.valid);

        assert_eq!(store.height().unwrap(), 3);
        let second = store.get_by_index(1).unwrap();
        let hash = second["hash"].as_str().unwrap().to_string();
        assert_eq!(store.get_by_hash(&hash).unwrap()["index"], 1);
    }
}
