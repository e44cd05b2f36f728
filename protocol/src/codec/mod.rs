//! Wire codecs. Record layouts only live here; nesting, length prefixes
//! and integer canonicalization are the rlp crate's concern.

pub mod operation;
pub mod signature;
#[cfg(test)]
mod tests;

use std::error::Error;

use bytes::{Bytes, BytesMut};
use derive_more::{Display, From};
use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use rlp::{DecoderError, Rlp, RlpStream};

use crate::types::{
    BlockchainId, OperationData, OperationType, SignatureData, SignatureType, Transaction,
    MAX_PAYLOAD_LEN,
};
use crate::{ProtocolError, ProtocolErrorKind, ProtocolResult};

/// Field count of an unsigned transaction record.
const UNSIGNED_TX_FIELDS: usize = 9;
/// Field count of a signed transaction record.
const SIGNED_TX_FIELDS: usize = 10;

impl Transaction {
    /// Canonical unsigned encoding: the 9 field record that is hashed for
    /// signing.
    pub fn encode_unsigned(&self) -> Bytes {
        self.encode_envelope(self.signature_type, None)
    }

    /// Canonical signed encoding: the unsigned record plus the signature
    /// body as its 10th field.
    pub fn encode_signed(&self) -> ProtocolResult<Bytes> {
        let signature = self
            .signature
            .as_ref()
            .ok_or(CodecError::SignatureMissing)?;
        Ok(self.encode_envelope(self.signature_type, Some(signature)))
    }

    pub(crate) fn encode_envelope(
        &self,
        sig_type: SignatureType,
        signature: Option<&SignatureData>,
    ) -> Bytes {
        let op_body = self.operation.encode();

        let mut s = RlpStream::new_list(if signature.is_some() {
            SIGNED_TX_FIELDS
        } else {
            UNSIGNED_TX_FIELDS
        });
        append_uint(&mut s, &self.nonce);
        s.append(&self.chain_id.value());
        append_uint(&mut s, &self.gas_price);
        s.append(&self.gas_coin);
        s.append(&self.operation.op_type().value());
        // nested: the operation body goes in as an opaque byte string
        s.append(&op_body);
        s.append(&self.payload.to_vec());
        s.append(&self.service_data.to_vec());
        s.append(&sig_type.value());
        if let Some(signature) = signature {
            s.append(&signature.encode());
        }

        Bytes::from(s.out())
    }

    /// Decodes a previously-signed transaction from its wire hex.
    pub fn from_encoded(encoded: &str) -> ProtocolResult<Self> {
        let raw = hex::decode(encoded.trim_start_matches("0x")).map_err(CodecError::from)?;
        Self::decode(&raw)
    }

    /// Decodes a previously-signed transaction from wire bytes.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        let tx = decode_envelope(&Rlp::new(bytes))?;
        debug!(
            "decoded {:?} transaction, nonce {}",
            tx.operation.op_type(),
            tx.nonce
        );
        Ok(tx)
    }
}

fn decode_envelope(r: &Rlp) -> Result<Transaction, CodecError> {
    let field_count = r.item_count()?;
    if field_count < SIGNED_TX_FIELDS {
        return Err(CodecError::MalformedTransaction {
            expect: SIGNED_TX_FIELDS,
            real:   field_count,
        });
    }

    let nonce = uint_at(r, 0)?;
    let chain_raw: u64 = r.at(1)?.as_val()?;
    let chain_id = BlockchainId::from_value(chain_raw).ok_or(CodecError::UnknownChainId(chain_raw))?;
    let gas_price = uint_at(r, 2)?;
    let gas_coin: u64 = r.at(3)?.as_val()?;

    let op_tag: u64 = r.at(4)?.as_val()?;
    let op_type =
        OperationType::from_value(op_tag).ok_or(CodecError::UnsupportedOperation(op_tag))?;
    // field 5 is itself a complete encoding; decode it recursively
    let operation = OperationData::decode(op_type, r.at(5)?.data()?)?;

    let payload = BytesMut::from(r.at(6)?.data()?).freeze();
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(CodecError::PayloadOverflow {
            size: payload.len(),
        });
    }
    let service_data = BytesMut::from(r.at(7)?.data()?).freeze();

    let sig_tag: u64 = r.at(8)?.as_val()?;
    let signature_type =
        SignatureType::from_value(sig_tag).ok_or(CodecError::UnsupportedSignatureType(sig_tag))?;
    // field 9 nests the signature body the same way field 5 nests the
    // operation body
    let signature = SignatureData::decode(signature_type, r.at(9)?.data()?)?;

    Ok(Transaction {
        nonce,
        chain_id,
        gas_price,
        gas_coin,
        operation,
        payload,
        service_data,
        signature_type,
        signature: Some(signature),
    })
}

pub(crate) fn append_uint(s: &mut RlpStream, v: &BigUint) {
    if v.is_zero() {
        s.append_empty_data();
    } else {
        s.append(&v.to_bytes_be());
    }
}

pub(crate) fn append_uint_opt(s: &mut RlpStream, v: Option<&BigUint>) {
    match v {
        Some(v) => append_uint(s, v),
        None => {
            s.append_empty_data();
        }
    }
}

pub(crate) fn uint_at(r: &Rlp, index: usize) -> Result<BigUint, DecoderError> {
    // a sign-fix byte ahead of a large value is harmless here: leading
    // zeros do not change the big-endian value
    Ok(BigUint::from_bytes_be(r.at(index)?.data()?))
}

#[derive(Debug, Display, From)]
pub enum CodecError {
    #[display(fmt = "encoded transaction has {} top-level fields, expected {}", real, expect)]
    #[from(ignore)]
    MalformedTransaction { expect: usize, real: usize },

    #[display(fmt = "unsupported operation type {:#x}", _0)]
    #[from(ignore)]
    UnsupportedOperation(u64),

    #[display(fmt = "unsupported signature type {}", _0)]
    #[from(ignore)]
    UnsupportedSignatureType(u64),

    #[display(fmt = "unknown chain id {}", _0)]
    #[from(ignore)]
    UnknownChainId(u64),

    #[display(fmt = "payload is {} bytes, maximum is 1024", size)]
    #[from(ignore)]
    PayloadOverflow { size: usize },

    #[display(fmt = "transaction is not signed")]
    SignatureMissing,

    Decoder(rlp::DecoderError),

    InvalidHex(hex::FromHexError),
}

impl Error for CodecError {}

impl From<CodecError> for ProtocolError {
    fn from(err: CodecError) -> ProtocolError {
        ProtocolError::new(ProtocolErrorKind::Codec, Box::new(err))
    }
}
