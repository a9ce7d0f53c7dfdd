//! Chain Verification.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use core::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::block::Block;
use crate::config::{VerifierConfig, GENESIS_POSITION};
use crate::error::KernelResult;
use crate::hash::block_hash;

/// Why a single block was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum FailureReason {
    /// `previousHash` differs from the stored hash of the preceding block.
    LinkMismatch { expected: String, found: String },
    /// Stored hash differs from the digest recomputed over the block fields.
    HashMismatch { stored: String, computed: String },
    /// The payload violated the canonical-form contract and could not be hashed.
    Canonicalization { message: String },
}

/// A rejected block, attributed to its position in the sorted sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockFailure {
    pub position: usize,
    pub index: i64,
    #[serde(flatten)]
    pub reason: FailureReason,
}

impl fmt::Display for BlockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FailureReason::LinkMismatch { expected, found } => write!(
                f,
                "block {} (index {}): previousHash '{}' does not match preceding hash '{}'",
                self.position, self.index, found, expected
            ),
            FailureReason::HashMismatch { stored, computed } => write!(
                f,
                "block {} (index {}): computed hash '{}' does not match stored hash '{}'",
                self.position, self.index, computed, stored
            ),
            FailureReason::Canonicalization { message } => write!(
                f,
                "block {} (index {}): payload cannot be canonicalized: {}",
                self.position, self.index, message
            ),
        }
    }
}

/// Result of checking one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockVerdict {
    Valid,
    Invalid(BlockFailure),
}

impl BlockVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, BlockVerdict::Valid)
    }
}

/// Aggregate result of a verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainOutcome {
    total_blocks: usize,
    invalid_count: usize,
    failures: Vec<BlockFailure>,
}

impl ChainOutcome {
    fn new(total_blocks: usize, failures: Vec<BlockFailure>) -> Self {
        Self {
            total_blocks,
            invalid_count: failures.len(),
            failures,
        }
    }

    /// True iff no block was rejected.
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_blocks(&self) -> usize {
        self.total_blocks
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid_count
    }

    /// Failures in ascending position order.
    pub fn failures(&self) -> &[BlockFailure] {
        &self.failures
    }
}

/// Checks a single position against its predecessor.
///
/// The genesis position is accepted unconditionally. Otherwise the link is
/// checked first and a broken link short-circuits the hash check. Returns
/// `None` when `position` is past the end of `blocks`.
pub fn verify_block(blocks: &[Block], position: usize) -> Option<BlockVerdict> {
    let block = blocks.get(position)?;
    if position == GENESIS_POSITION {
        return Some(BlockVerdict::Valid);
    }
    let previous = &blocks[position - 1];

    let invalid = |reason| {
        BlockVerdict::Invalid(BlockFailure {
            position,
            index: block.index,
            reason,
        })
    };

    if block.previous_hash != previous.hash {
        return Some(invalid(FailureReason::LinkMismatch {
            expected: previous.hash.clone(),
            found: block.previous_hash.clone(),
        }));
    }

    let verdict = match block_hash(block) {
        Ok(computed) if computed == block.hash => BlockVerdict::Valid,
        Ok(computed) => invalid(FailureReason::HashMismatch {
            stored: block.hash.clone(),
            computed,
        }),
        Err(e) => invalid(FailureReason::Canonicalization {
            message: e.to_string(),
        }),
    };
    Some(verdict)
}

/// Runs per-block checks in parallel over an already sorted sequence.
///
/// Every position is checked; a failure never cancels the remaining checks.
#[derive(Default)]
pub struct ChainVerifier {
    pool: Option<rayon::ThreadPool>,
}

impl ChainVerifier {
    pub fn new(config: &VerifierConfig) -> KernelResult<Self> {
        let pool = match config.threads {
            0 => None,
            n => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
        };
        Ok(Self { pool })
    }

    pub fn verify_chain(&self, blocks: &[Block]) -> ChainOutcome {
        if blocks.is_empty() {
            return ChainOutcome::new(0, Vec::new());
        }

        // Collect keeps input order, so the verdicts come back in position
        // order whatever order the workers finish in. Every position is in
        // range, so no verdict is dropped by `filter_map`.
        let check_all = || -> Vec<BlockVerdict> {
            (GENESIS_POSITION + 1..blocks.len())
                .into_par_iter()
                .filter_map(|position| verify_block(blocks, position))
                .collect()
        };
        let verdicts = match &self.pool {
            Some(pool) => pool.install(check_all),
            None => check_all(),
        };

        let failures: Vec<BlockFailure> = verdicts
            .into_iter()
            .filter_map(|verdict| match verdict {
                BlockVerdict::Valid => None,
                BlockVerdict::Invalid(failure) => Some(failure),
            })
            .collect();

        for failure in &failures {
            tracing::warn!("{}", failure);
        }
        tracing::info!(
            blocks = blocks.len(),
            invalid = failures.len(),
            "chain verification finished"
        );

        ChainOutcome::new(blocks.len(), failures)
    }
}

/// Verifies a sorted sequence on the global rayon pool.
pub fn verify_chain(blocks: &[Block]) -> ChainOutcome {
    ChainVerifier::default().verify_chain(blocks)
}
