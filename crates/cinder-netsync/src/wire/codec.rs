//! # Message Codec
//!
//! Frame layout:
//!
//! ```text
//! +----------+----------------+-------------------+
//! |   Kind   | Payload length |      Payload      |
//! | 1 byte   |     varint     |  (length bytes)   |
//! +----------+----------------+-------------------+
//! ```
//!
//! The payload is the message's field-tagged encoding. Decoding rejects
//! unknown kinds, oversize payloads, truncation, and trailing bytes.

use crate::wire::messages::{
    CheckHash, FetchBlocksHeaders, LocateHeaders, MessageKind, SyncBlocks, SyncCheckHash,
    SyncHeaders, SyncMessage,
};
use bytes::{BufMut, BytesMut};
use cinder_types::wire::{self, WireError, WIRE_LEN, WIRE_VARINT};
use cinder_types::{Block, BlockHeader};

impl LocateHeaders {
    fn encode_into(&self, buf: &mut BytesMut) {
        for hash in &self.hashes {
            wire::put_bytes_field(buf, 1, hash);
        }
    }

    fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut msg = LocateHeaders::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_LEN) => msg.hashes.push(wire::take_digest(&mut input, 1)?),
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(msg)
    }
}

impl SyncHeaders {
    fn encode_into(&self, buf: &mut BytesMut) {
        for hash in &self.hashes {
            wire::put_bytes_field(buf, 1, hash);
        }
        for header in &self.headers {
            wire::put_bytes_field(buf, 2, &header.encode());
        }
    }

    fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut msg = SyncHeaders::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_LEN) => msg.hashes.push(wire::take_digest(&mut input, 1)?),
                (2, WIRE_LEN) => {
                    msg.headers
                        .push(BlockHeader::decode(wire::take_bytes(&mut input)?)?);
                }
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(msg)
    }
}

impl CheckHash {
    fn encode_into(&self, buf: &mut BytesMut) {
        wire::put_bytes_field(buf, 1, &self.begin_hash);
        wire::put_varint_field(buf, 2, u64::from(self.length));
    }

    fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut msg = CheckHash::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_LEN) => msg.begin_hash = wire::take_digest(&mut input, 1)?,
                (2, WIRE_VARINT) => msg.length = wire::get_uvarint(&mut input)? as u32,
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(msg)
    }
}

impl SyncCheckHash {
    fn encode_into(&self, buf: &mut BytesMut) {
        wire::put_bytes_field(buf, 1, &self.root_hash);
    }

    fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut msg = SyncCheckHash::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_LEN) => msg.root_hash = wire::take_digest(&mut input, 1)?,
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(msg)
    }
}

impl FetchBlocksHeaders {
    fn encode_into(&self, buf: &mut BytesMut) {
        for hash in &self.hashes {
            wire::put_bytes_field(buf, 1, hash);
        }
    }

    fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut msg = FetchBlocksHeaders::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_LEN) => msg.hashes.push(wire::take_digest(&mut input, 1)?),
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(msg)
    }
}

impl SyncBlocks {
    fn encode_into(&self, buf: &mut BytesMut) {
        for block in &self.blocks {
            wire::put_bytes_field(buf, 1, &block.encode());
        }
    }

    fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut msg = SyncBlocks::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_LEN) => msg.blocks.push(Block::decode(wire::take_bytes(&mut input)?)?),
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(msg)
    }
}

/// Encode a message into a frame.
pub fn encode_message(message: &SyncMessage) -> Vec<u8> {
    let mut payload = BytesMut::new();
    match message {
        SyncMessage::LocateHeaders(m) => m.encode_into(&mut payload),
        SyncMessage::SyncHeaders(m) => m.encode_into(&mut payload),
        SyncMessage::CheckHash(m) => m.encode_into(&mut payload),
        SyncMessage::SyncCheckHash(m) => m.encode_into(&mut payload),
        SyncMessage::FetchBlocksHeaders(m) => m.encode_into(&mut payload),
        SyncMessage::SyncBlocks(m) => m.encode_into(&mut payload),
    }

    let mut frame = BytesMut::with_capacity(payload.len() + 10);
    frame.put_u8(message.kind() as u8);
    wire::put_uvarint(&mut frame, payload.len() as u64);
    frame.put_slice(&payload);
    frame.to_vec()
}

/// Decode one complete frame.
pub fn decode_message(input: &[u8], max_bytes: usize) -> Result<SyncMessage, WireError> {
    let mut input = input;
    let Some((&kind_byte, rest)) = input.split_first() else {
        return Err(WireError::Truncated);
    };
    input = rest;

    let kind = MessageKind::from_byte(kind_byte).ok_or(WireError::UnknownKind(kind_byte))?;
    let length = wire::get_uvarint(&mut input)? as usize;
    if length > max_bytes {
        return Err(WireError::OversizeMessage {
            got: length,
            max: max_bytes,
        });
    }
    if input.len() < length {
        return Err(WireError::Truncated);
    }
    if input.len() > length {
        return Err(WireError::TrailingBytes);
    }

    match kind {
        MessageKind::LocateHeaders => LocateHeaders::decode(input).map(SyncMessage::LocateHeaders),
        MessageKind::SyncHeaders => SyncHeaders::decode(input).map(SyncMessage::SyncHeaders),
        MessageKind::CheckHash => CheckHash::decode(input).map(SyncMessage::CheckHash),
        MessageKind::SyncCheckHash => SyncCheckHash::decode(input).map(SyncMessage::SyncCheckHash),
        MessageKind::FetchBlocksHeaders => {
            FetchBlocksHeaders::decode(input).map(SyncMessage::FetchBlocksHeaders)
        }
        MessageKind::SyncBlocks => SyncBlocks::decode(input).map(SyncMessage::SyncBlocks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_types::{build_genesis, Hash, MAINNET_MAGIC};
    use proptest::prelude::*;

    const MAX: usize = 1024 * 1024;

    fn make_hash(n: u8) -> Hash {
        let mut h = [0u8; 32];
        h[0] = n;
        h
    }

    fn round_trip(message: SyncMessage) -> SyncMessage {
        decode_message(&encode_message(&message), MAX).unwrap()
    }

    #[test]
    fn test_locate_headers_round_trip() {
        let msg = SyncMessage::LocateHeaders(LocateHeaders {
            hashes: vec![make_hash(5), make_hash(3), make_hash(0)],
        });
        assert_eq!(round_trip(msg.clone()), msg);
    }

    #[test]
    fn test_sync_headers_round_trip() {
        let genesis = build_genesis(MAINNET_MAGIC);
        let msg = SyncMessage::SyncHeaders(SyncHeaders {
            hashes: vec![genesis.hash()],
            headers: vec![genesis.header.clone()],
        });
        assert_eq!(round_trip(msg.clone()), msg);
    }

    #[test]
    fn test_check_hash_round_trip() {
        let msg = SyncMessage::CheckHash(CheckHash {
            begin_hash: make_hash(9),
            length: 300,
        });
        assert_eq!(round_trip(msg.clone()), msg);
    }

    #[test]
    fn test_sync_check_hash_round_trip() {
        let msg = SyncMessage::SyncCheckHash(SyncCheckHash {
            root_hash: make_hash(7),
        });
        assert_eq!(round_trip(msg.clone()), msg);
    }

    #[test]
    fn test_fetch_and_blocks_round_trip() {
        let genesis = build_genesis(MAINNET_MAGIC);
        let fetch = SyncMessage::FetchBlocksHeaders(FetchBlocksHeaders {
            hashes: vec![genesis.hash()],
        });
        assert_eq!(round_trip(fetch.clone()), fetch);

        let blocks = SyncMessage::SyncBlocks(SyncBlocks {
            blocks: vec![genesis],
        });
        assert_eq!(round_trip(blocks.clone()), blocks);
    }

    #[test]
    fn test_empty_messages_round_trip() {
        let msg = SyncMessage::LocateHeaders(LocateHeaders::default());
        assert_eq!(round_trip(msg.clone()), msg);
        let msg = SyncMessage::SyncHeaders(SyncHeaders::default());
        assert_eq!(round_trip(msg.clone()), msg);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let mut frame = encode_message(&SyncMessage::SyncCheckHash(SyncCheckHash::default()));
        frame[0] = 99;
        assert!(matches!(
            decode_message(&frame, MAX),
            Err(WireError::UnknownKind(99))
        ));
    }

    #[test]
    fn test_truncated_frame_rejected() {
        let frame = encode_message(&SyncMessage::SyncCheckHash(SyncCheckHash {
            root_hash: make_hash(1),
        }));
        assert!(decode_message(&frame[..frame.len() - 3], MAX).is_err());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut frame = encode_message(&SyncMessage::SyncCheckHash(SyncCheckHash::default()));
        frame.push(0xFF);
        assert!(matches!(
            decode_message(&frame, MAX),
            Err(WireError::TrailingBytes)
        ));
    }

    #[test]
    fn test_oversize_rejected() {
        let msg = SyncMessage::LocateHeaders(LocateHeaders {
            hashes: vec![make_hash(1); 10],
        });
        let frame = encode_message(&msg);
        assert!(matches!(
            decode_message(&frame, 16),
            Err(WireError::OversizeMessage { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_hash_list_round_trip(
            hashes in proptest::collection::vec(any::<[u8; 32]>(), 0..16)
        ) {
            let msg = SyncMessage::LocateHeaders(LocateHeaders { hashes });
            let decoded = decode_message(&encode_message(&msg), MAX).unwrap();
            prop_assert_eq!(decoded, msg);
        }
    }
}
