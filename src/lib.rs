// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! ernest-kernel: integrity auditor for append-only provenance hash chains.
//!
//! Raw block records are normalized by [`block::assemble`], each payload is
//! reduced to a deterministic [`canonical::CanonicalForm`], digests are
//! recomputed with [`hash::compute_hash`] and the whole sequence is checked by
//! [`verify::ChainVerifier`].

pub mod config;
pub mod error;
pub mod canonical;
pub mod hash;
pub mod block;
pub mod verify;
pub mod source;

pub use block::{assemble, Block};
pub use canonical::{canonicalize, CanonicalForm};
pub use error::{KernelError, KernelResult};
pub use hash::compute_hash;
pub use source::{audit, BlockSource};
pub use verify::{verify_chain, BlockFailure, BlockVerdict, ChainOutcome, ChainVerifier, FailureReason};

#[cfg(test)]
pub mod tests;
