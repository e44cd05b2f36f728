use std::fmt;

use bytes::Bytes;
use hasher::{Hasher, HasherKeccak};
use lazy_static::lazy_static;
use serde::de;
use serde::{Deserialize, Serialize};

use crate::types::TypesError;
use crate::ProtocolResult;

lazy_static! {
    static ref HASHER_INST: HasherKeccak = HasherKeccak::new();
}

/// Hash length
const HASH_LEN: usize = 32;
/// Address length.
const ADDRESS_LEN: usize = 20;
/// Candidate node public key length.
const PUBLIC_KEY_LEN: usize = 32;

/// Numeric coin identifier.
pub type CoinId = u64;

/// Identifier of the network base coin, the default gas coin.
pub const BASE_COIN_ID: CoinId = 0;

/// Network identifier carried by every transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockchainId {
    MainNet = 1,
    TestNet = 2,
}

impl BlockchainId {
    pub fn value(self) -> u64 {
        self as u64
    }

    pub fn from_value(val: u64) -> Option<Self> {
        match val {
            1 => Some(BlockchainId::MainNet),
            2 => Some(BlockchainId::TestNet),
            _ => None,
        }
    }
}

impl Default for BlockchainId {
    fn default() -> Self {
        BlockchainId::MainNet
    }
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(Bytes);

impl Hash {
    /// Keccak-256 digest of an arbitrary byte string.
    pub fn digest(bytes: Bytes) -> Self {
        let out = HASHER_INST.digest(&bytes);
        Self(Bytes::from(out))
    }

    /// Wraps an already-computed 32 byte digest.
    pub fn from_bytes(bytes: Bytes) -> ProtocolResult<Self> {
        ensure_len(bytes.len(), HASH_LEN)?;

        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> ProtocolResult<Self> {
        let s = clean_0x(s)?;
        let bytes = hex::decode(s).map_err(TypesError::from)?;

        Self::from_bytes(Bytes::from(bytes))
    }

    pub fn as_bytes(&self) -> Bytes {
        self.0.clone()
    }

    pub fn as_hex(&self) -> String {
        "0x".to_owned() + &hex::encode(self.0.clone())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(Bytes);

impl Address {
    pub fn from_bytes(bytes: Bytes) -> ProtocolResult<Self> {
        ensure_len(bytes.len(), ADDRESS_LEN)?;

        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> ProtocolResult<Self> {
        let s = clean_0x(s)?;
        let bytes = hex::decode(s).map_err(TypesError::from)?;

        Self::from_bytes(Bytes::from(bytes))
    }

    pub fn as_bytes(&self) -> Bytes {
        self.0.clone()
    }

    pub fn as_hex(&self) -> String {
        "0x".to_owned() + &hex::encode(self.0.clone())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.as_hex())
    }
}

struct AddressVisitor;

impl<'de> de::Visitor<'de> for AddressVisitor {
    type Value = Address;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("Expect a hex string")
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Address::from_hex(&v).map_err(|e| de::Error::custom(e.to_string()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Address::from_hex(v).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_string(AddressVisitor)
    }
}

/// A candidate node public key (32 bytes), distinct from the secp256k1
/// keys that sign transactions.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PublicKey(Bytes);

impl PublicKey {
    pub fn from_bytes(bytes: Bytes) -> ProtocolResult<Self> {
        ensure_len(bytes.len(), PUBLIC_KEY_LEN)?;

        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> ProtocolResult<Self> {
        let s = clean_0x(s)?;
        let bytes = hex::decode(s).map_err(TypesError::from)?;

        Self::from_bytes(Bytes::from(bytes))
    }

    pub fn as_bytes(&self) -> Bytes {
        self.0.clone()
    }

    pub fn as_hex(&self) -> String {
        "0x".to_owned() + &hex::encode(self.0.clone())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.as_hex())
    }
}

struct PublicKeyVisitor;

impl<'de> de::Visitor<'de> for PublicKeyVisitor {
    type Value = PublicKey;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("Expect a hex string")
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        PublicKey::from_hex(&v).map_err(|e| de::Error::custom(e.to_string()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        PublicKey::from_hex(v).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_string(PublicKeyVisitor)
    }
}

fn clean_0x(s: &str) -> ProtocolResult<&str> {
    if s.starts_with("0x") || s.starts_with("0X") {
        Ok(&s[2..])
    } else {
        Err(TypesError::HexPrefix.into())
    }
}

fn ensure_len(real: usize, expect: usize) -> ProtocolResult<()> {
    if real != expect {
        Err(TypesError::LengthMismatch { expect, real }.into())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::{Address, BlockchainId, Hash, PublicKey};

    #[test]
    fn test_hash_digest() {
        let hash = Hash::digest(Bytes::from("xxxxxx"));

        let bytes = hash.as_bytes();
        Hash::from_bytes(bytes).unwrap();
    }

    #[test]
    fn test_address() {
        let add_str = "d82558ea00eb81d35f2654953598f5d51737d31d";
        let bytes = Bytes::from(hex::decode(add_str).unwrap());

        let address = Address::from_bytes(bytes).unwrap();
        assert_eq!(add_str, &address.as_hex().as_str()[2..]);

        Address::from_hex("d82558ea00eb81d35f2654953598f5d51737d31d").unwrap_err();
        Address::from_hex("0xd82558ea00eb81d35f2654953598f5d517").unwrap_err();
    }

    #[test]
    fn test_public_key() {
        let key =
            PublicKey::from_hex("0x0eb98ea04ae466d8d38f490db3c99b3996a90e24243952ce9822c6dc1e2c1a43")
                .unwrap();
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn test_blockchain_id() {
        assert_eq!(BlockchainId::from_value(1), Some(BlockchainId::MainNet));
        assert_eq!(BlockchainId::from_value(2), Some(BlockchainId::TestNet));
        assert_eq!(BlockchainId::from_value(3), None);
    }

    #[test]
    fn test_address_serde() {
        let address = Address::from_hex("0xd82558ea00eb81d35f2654953598f5d51737d31d").unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0xd82558ea00eb81d35f2654953598f5d51737d31d\"");

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
