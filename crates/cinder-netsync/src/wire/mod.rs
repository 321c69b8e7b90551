//! # Sync Wire Protocol
//!
//! The six synchronization messages and their binary codec. Payloads use
//! the canonical field-tagged encoding from `cinder-types`; a frame is one
//! kind byte, a varint payload length, and the payload.

pub mod codec;
pub mod messages;

pub use codec::{decode_message, encode_message};
pub use messages::{
    CheckHash, FetchBlocksHeaders, LocateHeaders, MessageKind, SyncBlocks, SyncCheckHash,
    SyncHeaders, SyncMessage,
};
