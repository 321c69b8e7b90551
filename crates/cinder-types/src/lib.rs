//! # Cinder Core Types
//!
//! The hash-chain block model shared by every subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: [`Hash`], double SHA-256 digests, [`PeerId`]
//! - **Chain data**: [`BlockHeader`], [`Block`], [`Transaction`]
//! - **Encoding**: the canonical field-tagged wire format ([`wire`])
//! - **Commitments**: [`merkle_root`] over transaction/header hashes
//!
//! A header's identity is the double SHA-256 of its canonical encoding;
//! a block's identity is its header's identity. The encoding is injective
//! over well-formed values, so structural equality and hash equality agree.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod genesis;
pub mod hash;
pub mod header;
pub mod merkle;
pub mod peer;
pub mod tx;
pub mod wire;

pub use block::Block;
pub use genesis::{build_genesis, GENESIS_TIMESTAMP, MAINNET_MAGIC, TESTNET_MAGIC};
pub use hash::{double_sha256, sha256, short_hex, Hash, HASH_SIZE, ZERO_HASH};
pub use header::BlockHeader;
pub use merkle::{hash_pair, merkle_root};
pub use peer::PeerId;
pub use tx::{OutPoint, Transaction, TxIn, TxOut};
pub use wire::WireError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
