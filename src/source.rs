// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Boundary to the backing store and the audit entry point.

use serde_json::Value;

use crate::block::assemble;
use crate::error::{KernelError, KernelResult};
use crate::verify::{ChainOutcome, ChainVerifier};

/// Bulk reader of raw block records.
pub trait BlockSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch up to `limit` raw records, unfiltered, in store order.
    fn fetch(&self, limit: usize) -> Result<Vec<Value>, Self::Error>;
}

/// Fetches, assembles and verifies a chain.
///
/// A retrieval error aborts the run and is returned as
/// [`KernelError::Retrieval`]; it is never retried. Individual block failures
/// are reported inside the returned [`ChainOutcome`].
pub fn audit<S: BlockSource + ?Sized>(
    source: &S,
    limit: usize,
    verifier: &ChainVerifier,
) -> KernelResult<ChainOutcome> {
    let records = source
        .fetch(limit)
        .map_err(|e| KernelError::Retrieval(Box::new(e)))?;
    tracing::info!(records = records.len(), limit, "fetched raw block records");

    let blocks = assemble(&records);
    Ok(verifier.verify_chain(&blocks))
}
