//! # Block Header
//!
//! Fixed-layout header record whose double SHA-256 digest is the block's
//! identity.

use crate::hash::{double_sha256, Hash, ZERO_HASH};
use crate::wire::{self, WireError, WIRE_LEN, WIRE_VARINT};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};

/// Information about a block, carried both inside [`crate::Block`] and on
/// its own in header batches during synchronization.
///
/// Two headers with identical fields always hash identically; the canonical
/// encoding is injective, so distinct well-formed headers never share an
/// encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Version of the block. This is not the protocol version.
    pub version: i32,
    /// Digest of the previous block header in the chain.
    pub prev_block_hash: Hash,
    /// Merkle root over the block's transaction hashes.
    pub txs_root: Hash,
    /// Time the block was created, seconds since epoch.
    pub timestamp: i64,
    /// Network identifier (mainnet/testnet).
    pub magic: u32,
}

impl BlockHeader {
    /// Canonical encoding: fields in ascending tag order, none omitted.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(96);
        self.encode_into(&mut buf);
        buf.to_vec()
    }

    pub(crate) fn encode_into(&self, buf: &mut BytesMut) {
        wire::put_int_field(buf, 1, i64::from(self.version));
        wire::put_bytes_field(buf, 2, &self.prev_block_hash);
        wire::put_bytes_field(buf, 3, &self.txs_root);
        wire::put_int_field(buf, 4, self.timestamp);
        wire::put_varint_field(buf, 5, u64::from(self.magic));
    }

    /// Decode a header from its wire encoding.
    pub fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut header = BlockHeader::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_VARINT) => {
                    header.version = wire::get_uvarint(&mut input)? as i64 as i32;
                }
                (2, WIRE_LEN) => header.prev_block_hash = wire::take_digest(&mut input, 2)?,
                (3, WIRE_LEN) => header.txs_root = wire::take_digest(&mut input, 3)?,
                (4, WIRE_VARINT) => header.timestamp = wire::get_uvarint(&mut input)? as i64,
                (5, WIRE_VARINT) => header.magic = wire::get_uvarint(&mut input)? as u32,
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(header)
    }

    /// The header's identity: double SHA-256 over the canonical encoding.
    ///
    /// Deterministic and stable across repeated calls on an unmodified
    /// header.
    pub fn hash(&self) -> Hash {
        double_sha256(&self.encode())
    }

    /// True for the genesis header (no parent).
    pub fn is_genesis(&self) -> bool {
        self.prev_block_hash == ZERO_HASH
    }
}
