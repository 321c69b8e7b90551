//! # Message Types
//!
//! A closed tagged union of the six sync message kinds. Decoding goes
//! through the explicit kind discriminant; there is no open-ended payload
//! inspection.

use cinder_types::{Block, BlockHeader, Hash};

/// Requester → responder: the locator probes, nearest-tip first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocateHeaders {
    /// Probe hashes in back-off order, ending with genesis.
    pub hashes: Vec<Hash>,
}

/// Responder → requester: headers strictly after the fork point.
///
/// Field 1 carries the legacy bare hash list; field 2 carries the full
/// headers the current protocol path responds with. A responder fills
/// both, keeping old requesters working.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncHeaders {
    /// Hashes of the returned headers (legacy path).
    pub hashes: Vec<Hash>,
    /// The headers themselves, ascending height order.
    pub headers: Vec<BlockHeader>,
}

/// Requester → responder: ask for a checkpoint root over a header range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckHash {
    /// Hash of the first header in the range.
    pub begin_hash: Hash,
    /// Number of headers in the range.
    pub length: u32,
}

/// Responder → requester: the Merkle root over the requested range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncCheckHash {
    /// Root over the header hashes of the range.
    pub root_hash: Hash,
}

/// Requester → responder: request full blocks by hash, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchBlocksHeaders {
    /// Block hashes in the order the blocks must come back.
    pub hashes: Vec<Hash>,
}

/// Responder → requester: full blocks, order-matched to the request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncBlocks {
    /// The requested blocks, 1:1 and in request order (a prefix when the
    /// responder cannot serve the full batch).
    pub blocks: Vec<Block>,
}

/// Discriminant carried in the frame's kind byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageKind {
    /// [`LocateHeaders`]
    LocateHeaders = 1,
    /// [`SyncHeaders`]
    SyncHeaders = 2,
    /// [`CheckHash`]
    CheckHash = 3,
    /// [`SyncCheckHash`]
    SyncCheckHash = 4,
    /// [`FetchBlocksHeaders`]
    FetchBlocksHeaders = 5,
    /// [`SyncBlocks`]
    SyncBlocks = 6,
}

impl MessageKind {
    /// Map a frame byte back to a kind.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(MessageKind::LocateHeaders),
            2 => Some(MessageKind::SyncHeaders),
            3 => Some(MessageKind::CheckHash),
            4 => Some(MessageKind::SyncCheckHash),
            5 => Some(MessageKind::FetchBlocksHeaders),
            6 => Some(MessageKind::SyncBlocks),
            _ => None,
        }
    }
}

/// The closed union of every sync message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncMessage {
    /// Locator probes.
    LocateHeaders(LocateHeaders),
    /// Header batch after the fork point.
    SyncHeaders(SyncHeaders),
    /// Checkpoint root request.
    CheckHash(CheckHash),
    /// Checkpoint root response.
    SyncCheckHash(SyncCheckHash),
    /// Block fetch request.
    FetchBlocksHeaders(FetchBlocksHeaders),
    /// Block fetch response.
    SyncBlocks(SyncBlocks),
}

impl SyncMessage {
    /// The kind discriminant for this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            SyncMessage::LocateHeaders(_) => MessageKind::LocateHeaders,
            SyncMessage::SyncHeaders(_) => MessageKind::SyncHeaders,
            SyncMessage::CheckHash(_) => MessageKind::CheckHash,
            SyncMessage::SyncCheckHash(_) => MessageKind::SyncCheckHash,
            SyncMessage::FetchBlocksHeaders(_) => MessageKind::FetchBlocksHeaders,
            SyncMessage::SyncBlocks(_) => MessageKind::SyncBlocks,
        }
    }
}
