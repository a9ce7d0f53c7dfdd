//! Block digest computation.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use sha2::{Digest, Sha256};

use crate::block::Block;
use crate::canonical::canonicalize;
use crate::config::HASH_FIELD_DELIMITER;
use crate::error::KernelResult;

/// Computes the SHA-256 digest of a block header, lowercase hex encoded.
///
/// The preimage is the UTF-8 text `index|timestamp|payload|previousHash`.
/// Field order and delimiter must match the writer of the chain exactly,
/// there is no salt or nonce.
pub fn compute_hash(index: i64, timestamp: i64, canonical_payload: &str, previous_hash: &str) -> String {
    let mut hasher = Sha256::new();

    hasher.update(index.to_string().as_bytes());
    hasher.update([HASH_FIELD_DELIMITER as u8]);
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update([HASH_FIELD_DELIMITER as u8]);
    hasher.update(canonical_payload.as_bytes());
    hasher.update([HASH_FIELD_DELIMITER as u8]);
    hasher.update(previous_hash.as_bytes());

    hex::encode(hasher.finalize())
}

/// Canonicalizes the block payload and recomputes its digest.
pub fn block_hash(block: &Block) -> KernelResult<String> {
    let payload = canonicalize(&block.data)?;
    Ok(compute_hash(
        block.index,
        block.timestamp,
        payload.as_str(),
        &block.previous_hash,
    ))
}
