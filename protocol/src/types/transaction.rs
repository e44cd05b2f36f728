use std::error::Error;

use bytes::Bytes;
use derive_more::{Display, From};
use log::debug;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tern_crypto::{CryptoError, PrivateKey, SignerContext};

use crate::types::operation::OperationData;
use crate::types::primitive::{Address, BlockchainId, CoinId, Hash};
use crate::types::signature::{
    SignatureData, SignatureMultiData, SignatureSingleData, SignatureType,
};
use crate::types::{ValidationFailed, ValidationResult};
use crate::{ProtocolError, ProtocolErrorKind, ProtocolResult};

/// Hard cap on the user payload, in bytes.
pub const MAX_PAYLOAD_LEN: usize = 1024;

/// A typed transaction: envelope fields plus exactly one operation
/// variant. Built by `TransactionBuilder` or decoded from wire bytes;
/// mutated only by the signing entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub(crate) nonce:          BigUint,
    pub(crate) chain_id:       BlockchainId,
    pub(crate) gas_price:      BigUint,
    pub(crate) gas_coin:       CoinId,
    pub(crate) operation:      OperationData,
    pub(crate) payload:        Bytes,
    pub(crate) service_data:   Bytes,
    pub(crate) signature_type: SignatureType,
    pub(crate) signature:      Option<SignatureData>,
}

impl Transaction {
    pub fn nonce(&self) -> &BigUint {
        &self.nonce
    }

    pub fn chain_id(&self) -> BlockchainId {
        self.chain_id
    }

    pub fn gas_price(&self) -> &BigUint {
        &self.gas_price
    }

    pub fn gas_coin(&self) -> CoinId {
        self.gas_coin
    }

    pub fn operation(&self) -> &OperationData {
        &self.operation
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn payload_string(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    pub fn service_data(&self) -> &Bytes {
        &self.service_data
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    pub fn signature_data(&self) -> Option<&SignatureData> {
        self.signature.as_ref()
    }

    /// Aggregated field validation; every failure is reported.
    pub fn validate(&self) -> ValidationResult {
        self.operation.validate()
    }

    /// Keccak-256 of the unsigned envelope the single-signer flow signs.
    /// Use this to sign off-device and attach the result with
    /// `sign_external`. The hash does not depend on any attached
    /// signature, so re-signing never changes it.
    pub fn unsigned_hash(&self) -> Hash {
        self.signing_hash(SignatureType::Single)
    }

    pub(crate) fn signing_hash(&self, sig_type: SignatureType) -> Hash {
        Hash::digest(self.encode_envelope(sig_type, None))
    }

    /// Signs with a single private key and returns the signed wire hex.
    pub fn sign_single(&mut self, privkey: &PrivateKey) -> ProtocolResult<TransactionSign> {
        self.ensure_signable()?;

        let hash = self.signing_hash(SignatureType::Single);
        let ctx = SignerContext::new();
        let sig = ctx
            .sign_recoverable(&hash.as_bytes(), privkey)
            .map_err(SigningError::from)?;

        debug!("signed transaction, hash {:?}", hash);

        self.signature_type = SignatureType::Single;
        self.signature = Some(SignatureData::Single(SignatureSingleData::from_signature(
            &sig,
        )));
        self.to_sign()
    }

    /// Signs on behalf of a multisig address with every supplied key, in
    /// order, and returns the signed wire hex. The signer context is
    /// acquired once for the whole batch.
    pub fn sign_multi(
        &mut self,
        address: Address,
        privkeys: &[PrivateKey],
    ) -> ProtocolResult<TransactionSign> {
        if privkeys.is_empty() {
            return Err(SigningError::NoPrivateKeys.into());
        }
        self.ensure_signable()?;

        let hash = self.signing_hash(SignatureType::Multi);
        let ctx = SignerContext::new();
        let mut signatures = Vec::with_capacity(privkeys.len());
        for privkey in privkeys {
            let sig = ctx
                .sign_recoverable(&hash.as_bytes(), privkey)
                .map_err(SigningError::from)?;
            signatures.push(SignatureSingleData::from_signature(&sig));
        }

        debug!(
            "signed transaction with {} keys, hash {:?}",
            privkeys.len(),
            hash
        );

        self.signature_type = SignatureType::Multi;
        self.signature = Some(SignatureData::Multi(SignatureMultiData {
            address,
            signatures,
        }));
        self.to_sign()
    }

    /// Attaches an externally produced single signature verbatim.
    pub fn sign_external(
        &mut self,
        signature: SignatureSingleData,
    ) -> ProtocolResult<TransactionSign> {
        self.ensure_signable()?;

        self.signature_type = SignatureType::Single;
        self.signature = Some(SignatureData::Single(signature));
        self.to_sign()
    }

    /// Captures the fields reusable by another transaction: the operation,
    /// the payload and the gas hints, but not nonce or signature state.
    pub fn to_external(&self) -> ExternalTransaction {
        ExternalTransaction {
            operation: Some(self.operation.clone()),
            payload:   self.payload.clone(),
            gas_price: Some(self.gas_price.clone()),
            gas_coin:  Some(self.gas_coin),
        }
    }

    fn ensure_signable(&self) -> ProtocolResult<()> {
        let report = self.validate();
        if !report.is_valid() {
            return Err(ValidationFailed(report).into());
        }
        Ok(())
    }

    fn to_sign(&self) -> ProtocolResult<TransactionSign> {
        Ok(TransactionSign::new(hex::encode(self.encode_signed()?)))
    }
}

/// The signed wire form of a transaction: lowercase hex, no prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSign {
    tx_sign: String,
}

impl TransactionSign {
    pub fn new(tx_sign: String) -> Self {
        TransactionSign { tx_sign }
    }

    pub fn tx_sign(&self) -> &str {
        &self.tx_sign
    }

    pub fn into_string(self) -> String {
        self.tx_sign
    }
}

/// Operation, payload and gas hints captured from an already-built
/// transaction, reusable through `TransactionBuilder::from_external` with
/// a fresh nonce.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExternalTransaction {
    pub operation: Option<OperationData>,
    pub payload:   Bytes,
    pub gas_price: Option<BigUint>,
    pub gas_coin:  Option<CoinId>,
}

#[derive(Debug, Display, From)]
pub enum SigningError {
    #[display(fmt = "private keys can't be empty")]
    NoPrivateKeys,

    Crypto(CryptoError),
}

impl Error for SigningError {}

impl From<SigningError> for ProtocolError {
    fn from(error: SigningError) -> ProtocolError {
        ProtocolError::new(ProtocolErrorKind::Signing, Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use num_bigint::BigUint;
    use tern_crypto::PrivateKey;

    use crate::builder::TransactionBuilder;
    use crate::types::operation::{OperationData, SendCoin};
    use crate::types::primitive::{Address, BlockchainId};
    use crate::types::signature::{SignatureSingleData, SignatureType};
    use crate::ProtocolErrorKind;

    use super::Transaction;

    fn privkey() -> PrivateKey {
        PrivateKey::from_hex("05ddcd4e6f7d248ed1388f0091fe345bf9bf4fc2390384e26005e7675c98b3c1")
            .unwrap()
    }

    fn recipient() -> Address {
        Address::from_hex("0xd82558ea00eb81d35f2654953598f5d51737d31d").unwrap()
    }

    fn send_coin_tx() -> Transaction {
        TransactionBuilder::new(BigUint::from(1u64))
            .chain_id(BlockchainId::TestNet)
            .send_coin()
            .to(recipient())
            .value("1.5")
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_signing_hash_is_independent_of_signature_state() {
        let mut tx = send_coin_tx();
        let before = tx.unsigned_hash();

        tx.sign_single(&privkey()).unwrap();
        assert_eq!(tx.unsigned_hash(), before);

        // and the second signing produces identical output
        let first = tx.sign_single(&privkey()).unwrap();
        let second = tx.sign_single(&privkey()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resign_overwrites_signature_state_only() {
        let mut tx = send_coin_tx();
        tx.sign_multi(recipient(), &[privkey(), privkey()]).unwrap();
        assert_eq!(tx.signature_type(), SignatureType::Multi);

        let unsigned_before = tx.encode_envelope(SignatureType::Single, None);
        tx.sign_single(&privkey()).unwrap();
        assert_eq!(tx.signature_type(), SignatureType::Single);
        assert_eq!(tx.encode_envelope(SignatureType::Single, None), unsigned_before);
    }

    #[test]
    fn test_sign_multi_rejects_empty_key_list() {
        let mut tx = send_coin_tx();
        let err = tx.sign_multi(recipient(), &[]).unwrap_err();
        assert_eq!(err.kind(), ProtocolErrorKind::Signing);
        assert!(tx.signature_data().is_none());
    }

    #[test]
    fn test_failed_sign_leaves_prior_signature_untouched() {
        let mut tx = send_coin_tx();
        tx.sign_single(&privkey()).unwrap();
        let prior = tx.signature_data().cloned();

        // incomplete operation: not signable
        tx.operation = OperationData::SendCoin(SendCoin::default());
        let err = tx.sign_single(&privkey()).unwrap_err();
        assert_eq!(err.kind(), ProtocolErrorKind::Validation);
        assert_eq!(tx.signature_data().cloned(), prior);
        assert_eq!(tx.signature_type(), SignatureType::Single);
    }

    #[test]
    fn test_sign_external_matches_local_signing() {
        let mut local = send_coin_tx();
        let local_sign = local.sign_single(&privkey()).unwrap();

        // sign the digest off-transaction and attach the result verbatim
        let mut external = send_coin_tx();
        let ctx = tern_crypto::SignerContext::new();
        let sig = ctx
            .sign_recoverable(&external.unsigned_hash().as_bytes(), &privkey())
            .unwrap();
        let external_sign = external
            .sign_external(SignatureSingleData::from_signature(&sig))
            .unwrap();

        assert_eq!(local_sign, external_sign);
    }

    #[test]
    fn test_payload_string_round_trip() {
        let mut tx = send_coin_tx();
        tx.payload = Bytes::from(&b"hello"[..]);
        assert_eq!(tx.payload_string(), "hello");
    }

    #[test]
    fn test_encode_signed_requires_signature() {
        let tx = send_coin_tx();
        let err = tx.encode_signed().unwrap_err();
        assert_eq!(err.kind(), ProtocolErrorKind::Codec);
    }
}
