//! RLP layouts of the signature bodies.
//!
//! Single: `[r, s, v]`, components verbatim. Multi: `[address, [single,
//! ...]]` with entry order preserved. No cryptographic checks happen
//! here; verification is the signer's concern.

use bytes::BytesMut;
use rlp::{DecoderError, Rlp, RlpStream};

use crate::codec::CodecError;
use crate::types::{SignatureData, SignatureMultiData, SignatureSingleData, SignatureType};

impl rlp::Encodable for SignatureSingleData {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.r.to_vec());
        s.append(&self.s.to_vec());
        s.append(&self.v.to_vec());
    }
}

impl rlp::Decodable for SignatureSingleData {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(SignatureSingleData {
            r: BytesMut::from(r.at(0)?.data()?).freeze(),
            s: BytesMut::from(r.at(1)?.data()?).freeze(),
            v: BytesMut::from(r.at(2)?.data()?).freeze(),
        })
    }
}

impl rlp::Encodable for SignatureMultiData {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.address);
        s.append_list(&self.signatures);
    }
}

impl rlp::Decodable for SignatureMultiData {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        let signatures: Vec<SignatureSingleData> = r.at(1)?.as_list()?;
        if signatures.is_empty() {
            return Err(DecoderError::Custom("empty multi signature list"));
        }

        Ok(SignatureMultiData {
            address: r.at(0)?.as_val()?,
            signatures,
        })
    }
}

impl SignatureData {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            SignatureData::Single(data) => rlp::encode(data),
            SignatureData::Multi(data) => rlp::encode(data),
        }
    }

    pub fn decode(sig_type: SignatureType, body: &[u8]) -> Result<Self, CodecError> {
        let data = match sig_type {
            SignatureType::Single => SignatureData::Single(rlp::decode(body)?),
            SignatureType::Multi => SignatureData::Multi(rlp::decode(body)?),
        };
        Ok(data)
    }
}
