//! # Digests
//!
//! SHA-256 based identity hashing used throughout the chain.

use sha2::{Digest, Sha256};

/// Size of a digest in bytes.
pub const HASH_SIZE: usize = 32;

/// A 32-byte digest (block/header/transaction identity, Merkle nodes).
pub type Hash = [u8; HASH_SIZE];

/// The all-zero digest (parent of genesis, empty Merkle root).
pub const ZERO_HASH: Hash = [0u8; HASH_SIZE];

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Double application of SHA-256.
///
/// All chain identities (headers, transactions) and Merkle nodes use the
/// doubled digest.
pub fn double_sha256(data: &[u8]) -> Hash {
    sha256(&sha256(data))
}

/// Abbreviated hex form of a digest for log lines.
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..4])
}
