//! # Transactions
//!
//! Transaction structure with canonical encoding and identity hashing.
//! Script contents are opaque at this layer; script validation belongs to
//! a separate subsystem.

use crate::hash::{double_sha256, Hash, ZERO_HASH};
use crate::wire::{self, WireError, WIRE_LEN, WIRE_VARINT};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};

/// Reference to an output of a previous transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutPoint {
    /// Hash of the referenced transaction.
    pub hash: Hash,
    /// Output index within that transaction.
    pub index: u32,
}

/// A transaction input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    /// The output being spent.
    pub prev_out: OutPoint,
    /// Unlocking script (opaque here).
    pub script_sig: Vec<u8>,
    /// Sequence number.
    pub sequence: u32,
}

/// A transaction output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    /// Value in base units.
    pub value: u64,
    /// Locking script (opaque here).
    pub script_pubkey: Vec<u8>,
}

/// A transaction: inputs spending previous outputs, new outputs, lock time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction format version.
    pub version: i32,
    /// Inputs, in order.
    pub inputs: Vec<TxIn>,
    /// Outputs, in order.
    pub outputs: Vec<TxOut>,
    /// Earliest time the transaction may be included.
    pub lock_time: i64,
}

impl OutPoint {
    fn encode_into(&self, buf: &mut BytesMut) {
        wire::put_bytes_field(buf, 1, &self.hash);
        wire::put_varint_field(buf, 2, u64::from(self.index));
    }

    fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut out = OutPoint::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_LEN) => out.hash = wire::take_digest(&mut input, 1)?,
                (2, WIRE_VARINT) => out.index = wire::get_uvarint(&mut input)? as u32,
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(out)
    }
}

impl TxIn {
    fn encode_into(&self, buf: &mut BytesMut) {
        wire::put_message_field(buf, 1, |b| self.prev_out.encode_into(b));
        wire::put_bytes_field(buf, 2, &self.script_sig);
        wire::put_varint_field(buf, 3, u64::from(self.sequence));
    }

    fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut txin = TxIn::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_LEN) => txin.prev_out = OutPoint::decode(wire::take_bytes(&mut input)?)?,
                (2, WIRE_LEN) => txin.script_sig = wire::take_bytes(&mut input)?.to_vec(),
                (3, WIRE_VARINT) => txin.sequence = wire::get_uvarint(&mut input)? as u32,
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(txin)
    }
}

impl TxOut {
    fn encode_into(&self, buf: &mut BytesMut) {
        wire::put_varint_field(buf, 1, self.value);
        wire::put_bytes_field(buf, 2, &self.script_pubkey);
    }

    fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut txout = TxOut::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_VARINT) => txout.value = wire::get_uvarint(&mut input)?,
                (2, WIRE_LEN) => txout.script_pubkey = wire::take_bytes(&mut input)?.to_vec(),
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(txout)
    }
}

impl Transaction {
    /// Canonical encoding: fields in ascending tag order, none omitted.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf.to_vec()
    }

    pub(crate) fn encode_into(&self, buf: &mut BytesMut) {
        wire::put_int_field(buf, 1, i64::from(self.version));
        for input in &self.inputs {
            wire::put_message_field(buf, 2, |b| input.encode_into(b));
        }
        for output in &self.outputs {
            wire::put_message_field(buf, 3, |b| output.encode_into(b));
        }
        wire::put_int_field(buf, 4, self.lock_time);
    }

    /// Decode a transaction from its wire encoding.
    pub fn decode(mut input: &[u8]) -> Result<Self, WireError> {
        let mut tx = Transaction::default();
        while !input.is_empty() {
            let key = wire::get_field_key(&mut input)?;
            match (key.field, key.wire_type) {
                (1, WIRE_VARINT) => tx.version = wire::get_uvarint(&mut input)? as i64 as i32,
                (2, WIRE_LEN) => tx.inputs.push(TxIn::decode(wire::take_bytes(&mut input)?)?),
                (3, WIRE_LEN) => tx.outputs.push(TxOut::decode(wire::take_bytes(&mut input)?)?),
                (4, WIRE_VARINT) => tx.lock_time = wire::get_uvarint(&mut input)? as i64,
                (_, wire_type) => wire::skip_field(&mut input, wire_type)?,
            }
        }
        Ok(tx)
    }

    /// The transaction's identity: double SHA-256 over the canonical
    /// encoding.
    pub fn hash(&self) -> Hash {
        double_sha256(&self.encode())
    }

    /// True if the single input spends the null outpoint (block reward).
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1
            && self.inputs[0].prev_out.hash == ZERO_HASH
            && self.inputs[0].prev_out.index == u32::MAX
    }
}
