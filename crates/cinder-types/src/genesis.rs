//! # Genesis
//!
//! Pure construction of the height-0 block. There is no hidden global:
//! callers build the genesis once at startup and pass it by reference to
//! whatever holds chain state.

use crate::block::Block;
use crate::hash::ZERO_HASH;
use crate::header::BlockHeader;
use crate::tx::{OutPoint, Transaction, TxIn, TxOut};

/// Network identifier for the main network.
pub const MAINNET_MAGIC: u32 = 0x6369_6e64;

/// Network identifier for the test network.
pub const TESTNET_MAGIC: u32 = 0x7463_6e64;

/// Creation time of the genesis block, seconds since epoch.
pub const GENESIS_TIMESTAMP: i64 = 1_609_459_200;

/// Value of the genesis coinbase output, in base units.
pub const GENESIS_REWARD: u64 = 5_000_000_000;

/// Build the genesis block for the given network.
///
/// Deterministic: the same magic always yields the same block, and
/// therefore the same genesis hash.
pub fn build_genesis(magic: u32) -> Block {
    let coinbase = Transaction {
        version: 1,
        inputs: vec![TxIn {
            prev_out: OutPoint {
                hash: ZERO_HASH,
                index: u32::MAX,
            },
            script_sig: Vec::new(),
            sequence: u32::MAX,
        }],
        outputs: vec![TxOut {
            value: GENESIS_REWARD,
            script_pubkey: Vec::new(),
        }],
        lock_time: 0,
    };

    let mut block = Block {
        header: BlockHeader {
            version: 1,
            prev_block_hash: ZERO_HASH,
            txs_root: ZERO_HASH,
            timestamp: GENESIS_TIMESTAMP,
            magic,
        },
        txs: vec![coinbase],
        height: 0,
    };
    block.header.txs_root = block.compute_txs_root();
    block
}
