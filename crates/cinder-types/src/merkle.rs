//! # Merkle Root
//!
//! Pairwise-doubling Merkle construction over digest lists, used both for
//! transaction roots inside blocks and for checkpoint roots over header
//! ranges during synchronization.

use crate::hash::{double_sha256, Hash, HASH_SIZE, ZERO_HASH};

/// Hash two nodes together with the doubled digest.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut concat = [0u8; HASH_SIZE * 2];
    concat[..HASH_SIZE].copy_from_slice(left);
    concat[HASH_SIZE..].copy_from_slice(right);
    double_sha256(&concat)
}

/// Compute the Merkle root of a digest list.
///
/// An odd node at any level is paired with a duplicate of itself. A single
/// leaf is its own root; the empty list maps to the zero digest.
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return ZERO_HASH;
    }

    let mut level: Vec<Hash> = leaves.to_vec();
    while level.len() > 1 {
        let mut next_level = Vec::with_capacity((level.len() + 1) / 2);
        for chunk in level.chunks(2) {
            let left = &chunk[0];
            let right = chunk.get(1).unwrap_or(left); // Duplicate last if odd
            next_level.push(hash_pair(left, right));
        }
        level = next_level;
    }

    level[0]
}
