//! # Ledger Errors

use cinder_types::Hash;
use thiserror::Error;

/// Errors raised by chain append operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The first block of a batch references a parent the chain does not
    /// contain.
    #[error("parent block not in chain: {0:?}")]
    UnknownParent(Hash),

    /// A block's height does not follow its parent's.
    #[error("height gap: expected {expected}, got {got}")]
    HeightGap {
        /// Height the chain expected.
        expected: u32,
        /// Height the block carried.
        got: u32,
    },

    /// A block inside a batch does not reference the hash of the block
    /// before it.
    #[error("broken batch linkage at height {height}")]
    BrokenBatchLinkage {
        /// Height of the offending block.
        height: u32,
    },

    /// A batch rooted below the tip would not produce a strictly longer
    /// chain.
    #[error("batch would not extend the chain: tip {tip}, candidate {candidate}")]
    WouldNotExtend {
        /// Current tip height.
        tip: u32,
        /// Height the batch would reach.
        candidate: u32,
    },

    /// A block hashes to an identity the chain already holds.
    #[error("duplicate block hash: {0:?}")]
    DuplicateHash(Hash),
}
