use bytes::Bytes;
use num_bigint::BigUint;

use crate::types::primitive::{Address, CoinId, PublicKey};
use crate::types::ValidationResult;

/// Wire tag of an operation variant. The tag picks the decode routine for
/// the nested operation body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationType {
    SendCoin              = 0x01,
    SellCoin              = 0x02,
    SellAllCoins          = 0x03,
    BuyCoin               = 0x04,
    CreateCoin            = 0x05,
    DeclareCandidacy      = 0x06,
    Delegate              = 0x07,
    Unbond                = 0x08,
    RedeemCheck           = 0x09,
    SetCandidateOnline    = 0x0A,
    SetCandidateOffline   = 0x0B,
    CreateMultisigAddress = 0x0C,
    Multisend             = 0x0D,
    EditCandidate         = 0x0E,
}

impl OperationType {
    pub fn value(self) -> u64 {
        self as u64
    }

    pub fn from_value(val: u64) -> Option<Self> {
        use OperationType::*;

        match val {
            0x01 => Some(SendCoin),
            0x02 => Some(SellCoin),
            0x03 => Some(SellAllCoins),
            0x04 => Some(BuyCoin),
            0x05 => Some(CreateCoin),
            0x06 => Some(DeclareCandidacy),
            0x07 => Some(Delegate),
            0x08 => Some(Unbond),
            0x09 => Some(RedeemCheck),
            0x0A => Some(SetCandidateOnline),
            0x0B => Some(SetCandidateOffline),
            0x0C => Some(CreateMultisigAddress),
            0x0D => Some(Multisend),
            0x0E => Some(EditCandidate),
            _ => None,
        }
    }
}

/// Sends an amount of one coin to a single recipient. Also the item shape
/// of a multisend batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendCoin {
    pub coin:  CoinId,
    pub to:    Option<Address>,
    pub value: Option<BigUint>,
}

impl SendCoin {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default()
            .add_result("to", self.to.is_some(), "recipient address must be set")
            .add_result("value", self.value.is_some(), "value must be set")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SellCoin {
    pub coin_to_sell:     Option<CoinId>,
    pub value_to_sell:    Option<BigUint>,
    pub coin_to_buy:      Option<CoinId>,
    pub min_value_to_buy: Option<BigUint>,
}

impl SellCoin {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default()
            .add_result(
                "coin_to_sell",
                self.coin_to_sell.is_some(),
                "coin to sell must be set",
            )
            .add_result(
                "value_to_sell",
                self.value_to_sell.is_some(),
                "value to sell must be set",
            )
            .add_result(
                "coin_to_buy",
                self.coin_to_buy.is_some(),
                "coin to buy must be set",
            )
            .add_result(
                "min_value_to_buy",
                self.min_value_to_buy.is_some(),
                "minimum value to buy must be set",
            )
    }
}

/// Sells the entire balance of a coin; carries no sell amount on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SellAllCoins {
    pub coin_to_sell:     Option<CoinId>,
    pub coin_to_buy:      Option<CoinId>,
    pub min_value_to_buy: Option<BigUint>,
}

impl SellAllCoins {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default()
            .add_result(
                "coin_to_sell",
                self.coin_to_sell.is_some(),
                "coin to sell must be set",
            )
            .add_result(
                "coin_to_buy",
                self.coin_to_buy.is_some(),
                "coin to buy must be set",
            )
            .add_result(
                "min_value_to_buy",
                self.min_value_to_buy.is_some(),
                "minimum value to buy must be set",
            )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuyCoin {
    pub coin_to_buy:       Option<CoinId>,
    pub value_to_buy:      Option<BigUint>,
    pub coin_to_sell:      Option<CoinId>,
    pub max_value_to_sell: Option<BigUint>,
}

impl BuyCoin {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default()
            .add_result(
                "coin_to_buy",
                self.coin_to_buy.is_some(),
                "coin to buy must be set",
            )
            .add_result(
                "value_to_buy",
                self.value_to_buy.is_some(),
                "value to buy must be set",
            )
            .add_result(
                "coin_to_sell",
                self.coin_to_sell.is_some(),
                "coin to sell must be set",
            )
            .add_result(
                "max_value_to_sell",
                self.max_value_to_sell.is_some(),
                "maximum value to sell must be set",
            )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateCoin {
    pub name:                   String,
    pub symbol:                 String,
    pub initial_amount:         Option<BigUint>,
    pub initial_reserve:        Option<BigUint>,
    pub constant_reserve_ratio: u32,
    pub max_supply:             Option<BigUint>,
}

impl CreateCoin {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default()
            .add_result(
                "symbol",
                self.symbol.len() >= 3 && self.symbol.len() <= 10,
                "coin symbol length must be from 3 to 10 chars",
            )
            .add_result(
                "initial_amount",
                self.initial_amount.is_some(),
                "initial amount must be set",
            )
            .add_result(
                "initial_reserve",
                self.initial_reserve.is_some(),
                "initial reserve must be set",
            )
            .add_result(
                "constant_reserve_ratio",
                self.constant_reserve_ratio >= 10 && self.constant_reserve_ratio <= 100,
                "constant reserve ratio must be between 10 and 100",
            )
            .add_result(
                "max_supply",
                self.max_supply.is_some(),
                "maximum supply must be set",
            )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclareCandidacy {
    pub address:    Option<Address>,
    pub pub_key:    Option<PublicKey>,
    pub commission: u32,
    pub coin:       CoinId,
    pub stake:      Option<BigUint>,
}

impl DeclareCandidacy {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default()
            .add_result("address", self.address.is_some(), "owner address must be set")
            .add_result("pub_key", self.pub_key.is_some(), "node public key must be set")
            .add_result(
                "commission",
                self.commission <= 100,
                "commission must be between 0 and 100",
            )
            .add_result("stake", self.stake.is_some(), "stake must be set")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Delegate {
    pub pub_key: Option<PublicKey>,
    pub coin:    CoinId,
    pub stake:   Option<BigUint>,
}

impl Delegate {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default()
            .add_result("pub_key", self.pub_key.is_some(), "node public key must be set")
            .add_result("stake", self.stake.is_some(), "stake must be set")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Unbond {
    pub pub_key: Option<PublicKey>,
    pub coin:    CoinId,
    pub value:   Option<BigUint>,
}

impl Unbond {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default()
            .add_result("pub_key", self.pub_key.is_some(), "node public key must be set")
            .add_result("value", self.value.is_some(), "value must be set")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedeemCheck {
    pub raw_check: Bytes,
    pub proof:     Bytes,
}

impl RedeemCheck {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default().add_result(
            "raw_check",
            !self.raw_check.is_empty(),
            "check data must be set",
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetCandidateOnline {
    pub pub_key: Option<PublicKey>,
}

impl SetCandidateOnline {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default().add_result(
            "pub_key",
            self.pub_key.is_some(),
            "node public key must be set",
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetCandidateOffline {
    pub pub_key: Option<PublicKey>,
}

impl SetCandidateOffline {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default().add_result(
            "pub_key",
            self.pub_key.is_some(),
            "node public key must be set",
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateMultisigAddress {
    pub threshold: u64,
    pub weights:   Vec<u64>,
    pub addresses: Vec<Address>,
}

impl CreateMultisigAddress {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default()
            .add_result("threshold", self.threshold > 0, "threshold must be positive")
            .add_result(
                "addresses",
                !self.addresses.is_empty(),
                "at least one address must be set",
            )
            .add_result(
                "weights",
                self.weights.len() == self.addresses.len(),
                "one weight per address is required",
            )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Multisend {
    pub items: Vec<SendCoin>,
}

impl Multisend {
    pub fn validate(&self) -> ValidationResult {
        let result = ValidationResult::default().add_result(
            "items",
            !self.items.is_empty(),
            "at least one send item must be set",
        );

        self.items
            .iter()
            .fold(result, |acc, item| acc.merge(item.validate()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditCandidate {
    pub pub_key:        Option<PublicKey>,
    pub reward_address: Option<Address>,
    pub owner_address:  Option<Address>,
}

impl EditCandidate {
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::default()
            .add_result("pub_key", self.pub_key.is_some(), "node public key must be set")
            .add_result(
                "reward_address",
                self.reward_address.is_some(),
                "reward address must be set",
            )
            .add_result(
                "owner_address",
                self.owner_address.is_some(),
                "owner address must be set",
            )
    }
}

/// The payload of a transaction: exactly one operation variant. The tag
/// and the variant cannot disagree by construction; adding a variant is a
/// compile-checked change to every match below.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationData {
    SendCoin(SendCoin),
    SellCoin(SellCoin),
    SellAllCoins(SellAllCoins),
    BuyCoin(BuyCoin),
    CreateCoin(CreateCoin),
    DeclareCandidacy(DeclareCandidacy),
    Delegate(Delegate),
    Unbond(Unbond),
    RedeemCheck(RedeemCheck),
    SetCandidateOnline(SetCandidateOnline),
    SetCandidateOffline(SetCandidateOffline),
    CreateMultisigAddress(CreateMultisigAddress),
    Multisend(Multisend),
    EditCandidate(EditCandidate),
}

macro_rules! impl_into_operation_data {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for OperationData {
                fn from(op: $variant) -> OperationData {
                    OperationData::$variant(op)
                }
            }
        )+
    };
}

impl_into_operation_data![
    SendCoin,
    SellCoin,
    SellAllCoins,
    BuyCoin,
    CreateCoin,
    DeclareCandidacy,
    Delegate,
    Unbond,
    RedeemCheck,
    SetCandidateOnline,
    SetCandidateOffline,
    CreateMultisigAddress,
    Multisend,
    EditCandidate
];

impl OperationData {
    pub fn op_type(&self) -> OperationType {
        match self {
            OperationData::SendCoin(_) => OperationType::SendCoin,
            OperationData::SellCoin(_) => OperationType::SellCoin,
            OperationData::SellAllCoins(_) => OperationType::SellAllCoins,
            OperationData::BuyCoin(_) => OperationType::BuyCoin,
            OperationData::CreateCoin(_) => OperationType::CreateCoin,
            OperationData::DeclareCandidacy(_) => OperationType::DeclareCandidacy,
            OperationData::Delegate(_) => OperationType::Delegate,
            OperationData::Unbond(_) => OperationType::Unbond,
            OperationData::RedeemCheck(_) => OperationType::RedeemCheck,
            OperationData::SetCandidateOnline(_) => OperationType::SetCandidateOnline,
            OperationData::SetCandidateOffline(_) => OperationType::SetCandidateOffline,
            OperationData::CreateMultisigAddress(_) => OperationType::CreateMultisigAddress,
            OperationData::Multisend(_) => OperationType::Multisend,
            OperationData::EditCandidate(_) => OperationType::EditCandidate,
        }
    }

    pub fn validate(&self) -> ValidationResult {
        match self {
            OperationData::SendCoin(op) => op.validate(),
            OperationData::SellCoin(op) => op.validate(),
            OperationData::SellAllCoins(op) => op.validate(),
            OperationData::BuyCoin(op) => op.validate(),
            OperationData::CreateCoin(op) => op.validate(),
            OperationData::DeclareCandidacy(op) => op.validate(),
            OperationData::Delegate(op) => op.validate(),
            OperationData::Unbond(op) => op.validate(),
            OperationData::RedeemCheck(op) => op.validate(),
            OperationData::SetCandidateOnline(op) => op.validate(),
            OperationData::SetCandidateOffline(op) => op.validate(),
            OperationData::CreateMultisigAddress(op) => op.validate(),
            OperationData::Multisend(op) => op.validate(),
            OperationData::EditCandidate(op) => op.validate(),
        }
    }
}
