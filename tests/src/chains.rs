//! # Chain Fixtures
//!
//! Deterministic chains for the sync scenarios. Blocks carry a coinbase
//! plus a few pseudo-random transactions so transaction roots are
//! non-trivial; the generator is seeded, so two fixtures built with the
//! same parameters are identical block for block.

use cinder_ledger::SharedLedger;
use cinder_types::{
    build_genesis, Block, BlockHeader, OutPoint, Transaction, TxIn, TxOut, ZERO_HASH,
    MAINNET_MAGIC,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Block interval used by the fixtures, seconds.
const BLOCK_INTERVAL: i64 = 600;

fn coinbase() -> Transaction {
    Transaction {
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
            value: 5_000_000_000,
            script_pubkey: Vec::new(),
        }],
        lock_time: 0,
    }
}

fn spend(rng: &mut StdRng) -> Transaction {
    Transaction {
        version: 1,
        inputs: vec![TxIn {
            prev_out: OutPoint {
                hash: rng.gen(),
                index: rng.gen_range(0..4),
            },
            script_sig: vec![rng.gen()],
            sequence: u32::MAX,
        }],
        outputs: vec![TxOut {
            value: rng.gen_range(1..1_000_000),
            script_pubkey: vec![rng.gen()],
        }],
        lock_time: 0,
    }
}

/// Build the next block on top of `parent`, seeding its transactions from
/// `seed` so branches built with different seeds diverge.
pub fn next_block(parent: &Block, seed: u64) -> Block {
    let mut rng = StdRng::seed_from_u64(seed ^ u64::from(parent.height));
    let mut txs = vec![coinbase()];
    for _ in 0..rng.gen_range(1..4) {
        txs.push(spend(&mut rng));
    }

    let mut block = Block {
        header: BlockHeader {
            version: 1,
            prev_block_hash: parent.hash(),
            txs_root: ZERO_HASH,
            timestamp: parent.header.timestamp + BLOCK_INTERVAL,
            magic: parent.header.magic,
        },
        txs,
        height: parent.height + 1,
    };
    block.header.txs_root = block.compute_txs_root();
    block
}

/// A mainnet ledger extended to `height` with seed 0.
pub fn ledger_at_height(height: u32) -> SharedLedger {
    ledger_with_seed(height, 0)
}

/// A mainnet ledger extended to `height`, with blocks drawn from `seed`.
pub fn ledger_with_seed(height: u32, seed: u64) -> SharedLedger {
    let genesis = build_genesis(MAINNET_MAGIC);
    let ledger = SharedLedger::new(genesis.clone());
    let mut parent = genesis;
    for _ in 0..height {
        let block = next_block(&parent, seed);
        ledger.append_blocks(vec![block.clone()]).unwrap();
        parent = block;
    }
    ledger
}

/// Extend an existing ledger by `count` blocks drawn from `seed`.
pub fn grow(ledger: &SharedLedger, count: u32, seed: u64) {
    let mut parent = ledger
        .block_at_height(ledger.tip_height())
        .expect("tip block present");
    for _ in 0..count {
        let block = next_block(&parent, seed);
        ledger.append_blocks(vec![block.clone()]).unwrap();
        parent = block;
    }
}
