//! # Cinder Ledger
//!
//! The local chain collaborator: an ordered sequence of blocks from genesis
//! to tip, indexed by both height and hash, with no gaps and monotonically
//! increasing height.
//!
//! [`Chain`] is the single-threaded model; [`SharedLedger`] wraps it for
//! concurrent use. Reads are concurrent; `append_blocks` is the single
//! serialization point: it takes the write lock for the duration of a
//! commit, so height and hash indexes never observe a torn write.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod error;
pub mod shared;

pub use chain::Chain;
pub use error::LedgerError;
pub use shared::SharedLedger;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
