//! # Block
//!
//! A header plus its ordered transactions and an explicit chain height.

use crate::hash::Hash;
use crate::header::BlockHeader;
use crate::merkle::merkle_root;
use crate::tx::Transaction;
use crate::wire::{self, WireError, WIRE_LEN, WIRE_VARINT};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};

/// A block: header, transactions, and distance from genesis.
///
/// The block's identity is its header's identity; transactions influence it
/// only through the header's `txs_root` commitment. A block at height `h`
/// must have a parent whose hash equals `header.prev_block_hash` and whose
/// height is `h - 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The block header.
    pub header: BlockHeader,
    /// Transactions, in order. The first is the coinbase.
    pub txs: Vec<Transaction>,
    /// Height in the chain (genesis is 0).
    pub height: u32,
}

impl Block {
    /// The block identifier hash, defined as the header hash.
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Recompute the Merkle root over the block's transaction hashes.
    pub fn compute_txs_root(&self) -> Hash {
        let tx_hashes: Vec<Hash> = self.txs.iter().map(Transaction::hash).collect();
        merkle_root(&tx_hashes)
    }

    /// True when the header's `txs_root` commitment matches the
    /// transactions actually carried.
    pub fn txs_root_valid(&self) -> bool {
        self.header.txs_root == self.compute_txs_root()
    }

    /// Canonical encoding: header, transactions, height.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf.to_vec()
    }

    pub(crate) fn encode_into(&self, buf: &mut BytesMut) {
        wire::put_message_field(buf, 1, |b| self.header.encode_into(b));
        for tx in &self.txs {
            wire::put_message_field(buf, 2, |b| tx.encode_into(b));
        }
        wire::put_varint_field(buf, 3, u64::from(self.height));
    }

    /// Decode a block from its wire encoding.
    pub fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut block = Block::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_LEN) => {
                    block.header = BlockHeader::decode(wire::take_bytes(&mut input)?)?;
                }
                (2, WIRE_LEN) => {
                    block.txs.push(Transaction::decode(wire::take_bytes(&mut input)?)?);
                }
                (3, WIRE_VARINT) => block.height = wire::get_uvarint(&mut input)? as u32,
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::ZERO_HASH;
    use crate::tx::{OutPoint, TxIn, TxOut};

    fn make_hash(n: u8) -> Hash {
        let mut h = [0u8; 32];
        h[0] = n;
        h
    }

    fn sample_block() -> Block {
        let tx = Transaction {
            version: 1,
            inputs: vec![TxIn {
                prev_out: OutPoint {
                    hash: ZERO_HASH,
                    index: u32::MAX,
                },
                script_sig: vec![],
                sequence: u32::MAX,
            }],
            outputs: vec![TxOut {
                value: 50,
                script_pubkey: vec![0x51],
            }],
            lock_time: 0,
        };
        let mut block = Block {
            header: BlockHeader {
                version: 1,
                prev_block_hash: make_hash(1),
                txs_root: ZERO_HASH,
                timestamp: 1_700_000_000,
                magic: 0x6369_6e64,
            },
            txs: vec![tx],
            height: 2,
        };
        block.header.txs_root = block.compute_txs_root();
        block
    }

    #[test]
    fn test_block_hash_is_header_hash() {
        let block = sample_block();
        assert_eq!(block.hash(), block.header.hash());
    }

    #[test]
    fn test_txs_do_not_change_identity_directly() {
        let block = sample_block();
        let mut extended = block.clone();
        extended.txs.push(Transaction::default());
        // Identity is the header's; an unrecommitted tx list changes the
        // recomputed root but not the hash.
        assert_eq!(block.hash(), extended.hash());
        assert!(!extended.txs_root_valid());
    }

    #[test]
    fn test_txs_root_valid() {
        let block = sample_block();
        assert!(block.txs_root_valid());
    }

    #[test]
    fn test_round_trip() {
        let block = sample_block();
        let decoded = Block::decode(&block.encode()).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_round_trip_preserves_hash() {
        let block = sample_block();
        let decoded = Block::decode(&block.encode()).unwrap();
        assert_eq!(decoded.hash(), block.hash());
    }
}
