//! # Checkpoint Verifier
//!
//! A checkpoint root lets a requester validate an entire header batch with
//! one comparison. The root only proves agreement on content; the state
//! machine still replays prev-hash linkage before acceptance, because a
//! matching root says nothing about internal ordering on its own.

use cinder_ledger::SharedLedger;
use cinder_types::{merkle_root, BlockHeader, Hash};

/// Merkle root over the hashes of a header range, using the same
/// pairwise-doubling construction as transaction roots.
pub fn compute_range_root(headers: &[BlockHeader]) -> Hash {
    let hashes: Vec<Hash> = headers.iter().map(BlockHeader::hash).collect();
    merkle_root(&hashes)
}

/// Verify a header range against a claimed checkpoint root.
///
/// True only when the range is non-empty, its length and first hash match
/// the claimed span, and the recomputed root is byte-equal to
/// `claimed_root`. Pure: the same inputs always produce the same answer.
pub fn verify_range(
    begin_hash: &Hash,
    length: u32,
    claimed_root: &Hash,
    headers: &[BlockHeader],
) -> bool {
    if headers.len() != length as usize {
        return false;
    }
    let Some(first) = headers.first() else {
        return false;
    };
    if first.hash() != *begin_hash {
        return false;
    }
    compute_range_root(headers) == *claimed_root
}

/// Responder-side: the checkpoint root for a span of the local chain,
/// identified by its first block hash and length. `None` when the span is
/// not fully present.
pub fn range_root(ledger: &SharedLedger, begin_hash: &Hash, length: u32) -> Option<Hash> {
    if length == 0 {
        return None;
    }
    let begin_height = ledger.height_of(begin_hash)?;
    let mut headers = Vec::with_capacity(length as usize);
    for offset in 0..length {
        let header = ledger.header_at_height(begin_height + offset)?;
        headers.push(header);
    }
    Some(compute_range_root(&headers))
}
