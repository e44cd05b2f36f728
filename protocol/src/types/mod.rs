pub mod operation;
pub mod primitive;
pub mod signature;
pub mod transaction;
pub mod value;

use std::error::Error;
use std::fmt;

use derive_more::{Display, From};

use crate::{ProtocolError, ProtocolErrorKind};

pub use operation::{
    BuyCoin, CreateCoin, CreateMultisigAddress, DeclareCandidacy, Delegate, EditCandidate,
    Multisend, OperationData, OperationType, RedeemCheck, SellAllCoins, SellCoin, SendCoin,
    SetCandidateOffline, SetCandidateOnline, Unbond,
};
pub use primitive::{Address, BlockchainId, CoinId, Hash, PublicKey, BASE_COIN_ID};
pub use signature::{SignatureData, SignatureMultiData, SignatureSingleData, SignatureType};
pub use transaction::{ExternalTransaction, Transaction, TransactionSign, MAX_PAYLOAD_LEN};
pub use value::{humanize, normalize};

#[derive(Debug, Display, From)]
pub enum TypesError {
    #[display(fmt = "expect {} bytes, got {}", expect, real)]
    #[from(ignore)]
    LengthMismatch { expect: usize, real: usize },

    #[display(fmt = "hex string must start with 0x")]
    HexPrefix,

    FromHex(hex::FromHexError),

    #[display(fmt = "invalid decimal value: {}", _0)]
    InvalidDecimal(String),
}

impl Error for TypesError {}

impl From<TypesError> for ProtocolError {
    fn from(error: TypesError) -> ProtocolError {
        ProtocolError::new(ProtocolErrorKind::Types, Box::new(error))
    }
}

/// One failed field check, named for display to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field:   &'static str,
    pub message: &'static str,
}

/// Aggregated field validation report. Collects every failure instead of
/// stopping at the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn add_result(mut self, field: &'static str, ok: bool, message: &'static str) -> Self {
        if !ok {
            self.errors.push(FieldError { field, message });
        }
        self
    }

    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

#[derive(Debug, Display)]
#[display(fmt = "invalid transaction data: {}", _0)]
pub struct ValidationFailed(pub ValidationResult);

impl Error for ValidationFailed {}

impl From<ValidationFailed> for ProtocolError {
    fn from(error: ValidationFailed) -> ProtocolError {
        ProtocolError::new(ProtocolErrorKind::Validation, Box::new(error))
    }
}
