// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Separator placed between the hashed block fields.
///
/// Part of the digest wire format: `index|timestamp|payload|previousHash`.
pub const HASH_FIELD_DELIMITER: char = '|';

/// Maximum number of raw records pulled from a source in one audit.
pub const DEFAULT_FETCH_LIMIT: usize = 10_000;

/// Position of the genesis block in the sorted sequence.
pub const GENESIS_POSITION: usize = 0;

/// Floats with magnitude in `[1e-6, 1e21)` render in plain decimal notation, others with
/// an exponent. These are the ECMAScript Number-to-String bounds, expressed
/// as the decimal point position `n` of `0.digits x 10^n`.
pub const DECIMAL_POINT_MIN: i32 = -6;
pub const DECIMAL_POINT_MAX: i32 = 21;

#[derive(Debug, Clone, Default)]
pub struct VerifierConfig {
    /// Worker threads for per-block checks. `0` runs on the global rayon pool.
    pub threads: usize,
}

impl VerifierConfig {
    pub fn with_threads(threads: usize) -> Self {
        Self { threads }
    }
}
