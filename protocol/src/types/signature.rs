use bytes::{BufMut, Bytes, BytesMut};
use tern_crypto::RecoverableSignature;

use crate::types::primitive::Address;

/// Wire tag selecting the signature scheme of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureType {
    Single = 1,
    Multi  = 2,
}

impl SignatureType {
    pub fn value(self) -> u64 {
        self as u64
    }

    pub fn from_value(val: u64) -> Option<Self> {
        match val {
            1 => Some(SignatureType::Single),
            2 => Some(SignatureType::Multi),
            _ => None,
        }
    }
}

impl Default for SignatureType {
    fn default() -> Self {
        SignatureType::Single
    }
}

/// One recoverable signature, components stored verbatim as they appear
/// on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignatureSingleData {
    pub r: Bytes,
    pub s: Bytes,
    pub v: Bytes,
}

impl SignatureSingleData {
    pub fn new(r: Bytes, s: Bytes, v: Bytes) -> Self {
        SignatureSingleData { r, s, v }
    }

    pub fn from_signature(sig: &RecoverableSignature) -> Self {
        SignatureSingleData {
            r: Bytes::copy_from_slice(sig.r()),
            s: Bytes::copy_from_slice(sig.s()),
            v: Bytes::copy_from_slice(&[sig.v()]),
        }
    }

    /// `r || s || v`, the 65 byte compact form.
    pub fn compact(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.r.len() + self.s.len() + self.v.len());
        out.put_slice(&self.r);
        out.put_slice(&self.s);
        out.put_slice(&self.v);
        out.freeze()
    }
}

/// Signatures of several co-signers on behalf of a multisig address.
/// Entry order is the order the signatures were produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureMultiData {
    pub address:    Address,
    pub signatures: Vec<SignatureSingleData>,
}

/// Signature body of a transaction; the variant matches the transaction's
/// signature type by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureData {
    Single(SignatureSingleData),
    Multi(SignatureMultiData),
}

impl SignatureData {
    pub fn sig_type(&self) -> SignatureType {
        match self {
            SignatureData::Single(_) => SignatureType::Single,
            SignatureData::Multi(_) => SignatureType::Multi,
        }
    }
}
