//! # Canonical Wire Encoding
//!
//! Field-tagged binary encoding shared by chain data and sync messages.
//!
//! A message payload is a sequence of fields. Each field starts with a key
//! varint `(field_number << 3) | wire_type`, followed by either:
//!
//! ```text
//! wire type 0 (varint):          value varint
//! wire type 2 (length-delimited): length varint + that many bytes
//! ```
//!
//! Signed 32/64-bit integers ride as two's-complement 64-bit varints. Field
//! order is not semantically significant when decoding; unknown fields with
//! a well-formed wire type are skipped. For canonical (hash-relevant)
//! encoding, fields are always emitted in ascending tag order and never
//! omitted, which makes the encoding injective over well-formed values.

use crate::hash::{Hash, HASH_SIZE};
use bytes::{BufMut, BytesMut};
use thiserror::Error;

/// Wire type for varint fields.
pub const WIRE_VARINT: u8 = 0;

/// Wire type for length-delimited fields.
pub const WIRE_LEN: u8 = 2;

/// Errors raised while encoding or decoding wire data.
#[derive(Debug, Error)]
pub enum WireError {
    /// Input ended in the middle of a field.
    #[error("unexpected end of input")]
    Truncated,

    /// A varint did not terminate within 64 bits.
    #[error("varint overflows 64 bits")]
    VarintOverflow,

    /// A field used a wire type this codec does not speak.
    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),

    /// A digest field did not carry exactly [`HASH_SIZE`] bytes.
    #[error("field {field}: expected 32-byte digest, got {got} bytes")]
    BadDigestLength {
        /// Field number carrying the bad digest.
        field: u32,
        /// Length actually observed.
        got: usize,
    },

    /// The frame's kind byte does not name a known message.
    #[error("unknown message kind {0}")]
    UnknownKind(u8),

    /// A frame announced a payload larger than the configured cap.
    #[error("message payload of {got} bytes exceeds cap of {max}")]
    OversizeMessage {
        /// Announced payload length.
        got: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Bytes remained after the announced payload length was consumed.
    #[error("trailing bytes after message payload")]
    TrailingBytes,
}

/// A decoded field key.
#[derive(Debug, Clone, Copy)]
pub struct FieldKey {
    /// Field number.
    pub field: u32,
    /// Wire type (0 or 2).
    pub wire_type: u8,
}

/// Append an unsigned varint.
pub fn put_uvarint(buf: &mut BytesMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Read an unsigned varint, advancing the input.
pub fn get_uvarint(input: &mut &[u8]) -> Result<u64, WireError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    let mut index = 0usize;
    loop {
        let Some((&byte, rest)) = input.split_first() else {
            return Err(WireError::Truncated);
        };
        *input = rest;
        if byte < 0x80 {
            if index == 9 && byte > 1 {
                return Err(WireError::VarintOverflow);
            }
            return Ok(value | (u64::from(byte) << shift));
        }
        if index == 9 {
            return Err(WireError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7f) << shift;
        shift += 7;
        index += 1;
    }
}

/// Append a varint field (wire type 0).
pub fn put_varint_field(buf: &mut BytesMut, field: u32, value: u64) {
    put_uvarint(buf, (u64::from(field) << 3) | u64::from(WIRE_VARINT));
    put_uvarint(buf, value);
}

/// Append a signed integer field as a two's-complement 64-bit varint.
pub fn put_int_field(buf: &mut BytesMut, field: u32, value: i64) {
    put_varint_field(buf, field, value as u64);
}

/// Append a length-delimited field (wire type 2).
pub fn put_bytes_field(buf: &mut BytesMut, field: u32, data: &[u8]) {
    put_uvarint(buf, (u64::from(field) << 3) | u64::from(WIRE_LEN));
    put_uvarint(buf, data.len() as u64);
    buf.put_slice(data);
}

/// Append a nested message field: the closure encodes the child, which is
/// then framed as a length-delimited field.
pub fn put_message_field<F>(buf: &mut BytesMut, field: u32, encode: F)
where
    F: FnOnce(&mut BytesMut),
{
    let mut child = BytesMut::new();
    encode(&mut child);
    put_bytes_field(buf, field, &child);
}

/// Read the next field key, advancing the input.
pub fn get_field_key(input: &mut &[u8]) -> Result<FieldKey, WireError> {
    let key = get_uvarint(input)?;
    Ok(FieldKey {
        field: (key >> 3) as u32,
        wire_type: (key & 0x7) as u8,
    })
}

/// Read a length-delimited field body, advancing the input.
pub fn take_bytes<'a>(input: &mut &'a [u8]) -> Result<&'a [u8], WireError> {
    let len = get_uvarint(input)? as usize;
    if input.len() < len {
        return Err(WireError::Truncated);
    }
    let (head, tail) = input.split_at(len);
    *input = tail;
    Ok(head)
}

/// Read a length-delimited field that must be exactly one digest.
pub fn take_digest(input: &mut &[u8], field: u32) -> Result<Hash, WireError> {
    let raw = take_bytes(input)?;
    if raw.len() != HASH_SIZE {
        return Err(WireError::BadDigestLength {
            field,
            got: raw.len(),
        });
    }
    let mut hash = [0u8; HASH_SIZE];
    hash.copy_from_slice(raw);
    Ok(hash)
}

/// Skip a field of the given wire type, advancing the input.
pub fn skip_field(input: &mut &[u8], wire_type: u8) -> Result<(), WireError> {
    match wire_type {
        WIRE_VARINT => {
            get_uvarint(input)?;
            Ok(())
        }
        WIRE_LEN => {
            take_bytes(input)?;
            Ok(())
        }
        other => Err(WireError::UnsupportedWireType(other)),
    }
}
