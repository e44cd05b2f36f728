use std::fmt;

use secp256k1::{
    constants,
    key::{PublicKey as RawPublicKey, SecretKey},
    rand, Message, RecoverableSignature as RawRecoverableSignature, RecoveryId,
    Secp256k1 as RawSecp256k1,
};

const DIGEST_LEN: usize = 32;
const SIGNATURE_LEN: usize = constants::COMPACT_SIGNATURE_SIZE + 1;

/// Recovery byte offset. A serialized signature carries `27 + recovery_id`
/// in its last byte.
pub const V_OFFSET: u8 = 27;

/// Types associated with the signer can be converted to and from bytes.
pub trait CryptoTransform: Sized {
    fn from_bytes(data: &[u8]) -> Result<Self, CryptoError>;

    fn as_bytes(&self) -> &[u8];
}

#[derive(Clone)]
pub struct PrivateKey([u8; constants::SECRET_KEY_SIZE]);

impl CryptoTransform for PrivateKey {
    fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        if data.len() != constants::SECRET_KEY_SIZE {
            return Err(CryptoError::PrivateKeyInvalid);
        }

        let mut privkey = [0u8; constants::SECRET_KEY_SIZE];
        privkey[..].copy_from_slice(&data[..]);
        Ok(PrivateKey(privkey))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl PrivateKey {
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let s = s.trim_start_matches("0x");
        let bytes = hex::decode(s).map_err(|_| CryptoError::PrivateKeyInvalid)?;
        Self::from_bytes(&bytes)
    }
}

// Keep key material out of debug output.
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PrivateKey(..)")
    }
}

#[derive(Clone)]
pub struct PublicKey([u8; constants::PUBLIC_KEY_SIZE]);

impl CryptoTransform for PublicKey {
    fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        if data.len() != constants::PUBLIC_KEY_SIZE {
            return Err(CryptoError::PublicKeyInvalid);
        }

        let mut pubkey = [0u8; constants::PUBLIC_KEY_SIZE];
        pubkey[..].copy_from_slice(&data[..]);
        Ok(PublicKey(pubkey))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// A recoverable ECDSA signature serialized as `r || s || v`, where `v` is
/// `27 + recovery_id`.
#[derive(Clone, PartialEq, Eq)]
pub struct RecoverableSignature([u8; SIGNATURE_LEN]);

impl CryptoTransform for RecoverableSignature {
    fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        if data.len() != SIGNATURE_LEN {
            return Err(CryptoError::SignatureInvalid);
        }

        let mut sig = [0u8; SIGNATURE_LEN];
        sig[..].copy_from_slice(&data[..]);
        Ok(RecoverableSignature(sig))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl RecoverableSignature {
    pub fn from_rsv(r: &[u8], s: &[u8], v: u8) -> Result<Self, CryptoError> {
        if r.len() != 32 || s.len() != 32 {
            return Err(CryptoError::SignatureInvalid);
        }

        let mut sig = [0u8; SIGNATURE_LEN];
        sig[0..32].copy_from_slice(r);
        sig[32..64].copy_from_slice(s);
        sig[64] = v;
        Ok(RecoverableSignature(sig))
    }

    pub fn r(&self) -> &[u8] {
        &self.0[0..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    pub fn v(&self) -> u8 {
        self.0[64]
    }

    fn to_raw(&self) -> Result<RawRecoverableSignature, CryptoError> {
        let rec_id = RecoveryId::from_i32(i32::from(self.v().wrapping_sub(V_OFFSET)))
            .map_err(|_| CryptoError::SignatureInvalid)?;
        RawRecoverableSignature::from_compact(&self.0[0..64], rec_id)
            .map_err(|_| CryptoError::SignatureInvalid)
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// An owned secp256k1 execution context.
///
/// Acquire one immediately before signing and let it go out of scope when
/// done; the native context is released by `Drop` on every exit path.
/// Signing, verification and recovery borrow the context, so the borrow
/// checker rules out destroying it while a sibling call is in flight.
pub struct SignerContext {
    inner: RawSecp256k1<secp256k1::All>,
}

impl Default for SignerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SignerContext {
    pub fn new() -> Self {
        SignerContext {
            inner: RawSecp256k1::new(),
        }
    }

    /// Produces a recoverable signature over a 32 byte digest.
    pub fn sign_recoverable(
        &self,
        digest: &[u8],
        privkey: &PrivateKey,
    ) -> Result<RecoverableSignature, CryptoError> {
        let msg = msg(digest)?;
        let privkey = SecretKey::from_slice(privkey.as_bytes())
            .map_err(|_| CryptoError::PrivateKeyInvalid)?;

        let (rec_id, data) = self
            .inner
            .sign_recoverable(&msg, &privkey)
            .serialize_compact();

        let mut sig = [0u8; SIGNATURE_LEN];
        sig[0..64].copy_from_slice(&data[..]);
        sig[64] = V_OFFSET + rec_id.to_i32() as u8;
        Ok(RecoverableSignature(sig))
    }

    /// Recovers the public key that produced `signature` over `digest`.
    pub fn recover(
        &self,
        digest: &[u8],
        signature: &RecoverableSignature,
    ) -> Result<PublicKey, CryptoError> {
        let msg = msg(digest)?;
        let pubkey = self
            .inner
            .recover(&msg, &signature.to_raw()?)
            .map_err(|_| CryptoError::SignatureInvalid)?;
        Ok(PublicKey(pubkey.serialize()))
    }

    /// Checks `signature` against `digest` and the recovered key.
    pub fn verify(&self, digest: &[u8], signature: &RecoverableSignature) -> Result<(), CryptoError> {
        let msg = msg(digest)?;
        let sig = signature.to_raw()?;
        let pubkey = self
            .inner
            .recover(&msg, &sig)
            .map_err(|_| CryptoError::SignatureInvalid)?;

        self.inner
            .verify(&msg, &sig.to_standard(), &pubkey)
            .map_err(|_| CryptoError::SignatureInvalid)
    }

    pub fn pub_key(&self, privkey: &PrivateKey) -> Result<PublicKey, CryptoError> {
        let privkey = SecretKey::from_slice(privkey.as_bytes())
            .map_err(|_| CryptoError::PrivateKeyInvalid)?;
        let pubkey = RawPublicKey::from_secret_key(&self.inner, &privkey);
        Ok(PublicKey(pubkey.serialize()))
    }

    pub fn gen_keypair(&self) -> (PrivateKey, PublicKey) {
        let (sk, pubkey) = self.inner.generate_keypair(&mut rand::thread_rng());
        let mut privkey = [0u8; constants::SECRET_KEY_SIZE];
        privkey[..].copy_from_slice(&sk[..]);
        (PrivateKey(privkey), PublicKey(pubkey.serialize()))
    }
}

fn msg(digest: &[u8]) -> Result<Message, CryptoError> {
    if digest.len() != DIGEST_LEN {
        return Err(CryptoError::DigestInvalid);
    }
    Message::from_slice(digest).map_err(|_| CryptoError::DigestInvalid)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    SignatureInvalid,
    PrivateKeyInvalid,
    PublicKeyInvalid,
    DigestInvalid,
}

impl std::error::Error for CryptoError {}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            CryptoError::SignatureInvalid => "signature invalid",
            CryptoError::PrivateKeyInvalid => "private key invalid",
            CryptoError::PublicKeyInvalid => "public key invalid",
            CryptoError::DigestInvalid => "digest must be 32 bytes",
        };
        write!(f, "{}", printable)
    }
}
