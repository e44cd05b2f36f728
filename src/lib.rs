//! Tern SDK facade.
//!
//! Re-exports the protocol types and the crypto collaborator so that most
//! applications only need a single dependency.

pub use tern_crypto as crypto;
pub use tern_protocol as protocol;

pub use tern_crypto::{PrivateKey, RecoverableSignature, SignerContext};
pub use tern_protocol::builder::TransactionBuilder;
pub use tern_protocol::types::{
    Address, BlockchainId, CoinId, OperationData, PublicKey, SignatureType, Transaction,
    TransactionSign, BASE_COIN_ID,
};
