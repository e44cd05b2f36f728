//! Transaction accumulation. Field constraints are enforced at the setter
//! that receives them; operation fields go through one typed sub-builder
//! per variant.

use std::error::Error;

use bytes::Bytes;
use derive_more::Display;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::types::{
    normalize, Address, BlockchainId, BuyCoin, CoinId, CreateCoin, CreateMultisigAddress,
    DeclareCandidacy, Delegate, EditCandidate, ExternalTransaction, Multisend, OperationData,
    PublicKey, RedeemCheck, SellAllCoins, SellCoin, SendCoin, SetCandidateOffline,
    SetCandidateOnline, SignatureType, Transaction, TypesError, Unbond, ValidationFailed,
    BASE_COIN_ID, MAX_PAYLOAD_LEN,
};
use crate::{ProtocolError, ProtocolErrorKind, ProtocolResult};

#[derive(Debug, Display)]
pub enum BuilderError {
    #[display(fmt = "payload is {} bytes, maximum is {}", size, MAX_PAYLOAD_LEN)]
    PayloadTooLarge { size: usize },

    #[display(fmt = "{}", _0)]
    IllegalBuilderState(&'static str),
}

impl Error for BuilderError {}

impl From<BuilderError> for ProtocolError {
    fn from(err: BuilderError) -> ProtocolError {
        ProtocolError::new(ProtocolErrorKind::Builder, Box::new(err))
    }
}

#[derive(Debug)]
pub struct TransactionBuilder {
    nonce:        BigUint,
    chain_id:     BlockchainId,
    gas_price:    BigUint,
    gas_coin:     CoinId,
    payload:      Bytes,
    service_data: Bytes,
    operation:    Option<OperationData>,
}

impl TransactionBuilder {
    /// Starts a builder with the transaction nonce; everything else takes
    /// its default until set.
    pub fn new(nonce: BigUint) -> Self {
        TransactionBuilder {
            nonce,
            chain_id: BlockchainId::default(),
            gas_price: BigUint::one(),
            gas_coin: BASE_COIN_ID,
            payload: Bytes::new(),
            service_data: Bytes::new(),
            operation: None,
        }
    }

    /// Starts a builder from a previously captured external transaction:
    /// same operation and payload, fresh nonce and gas fields.
    pub fn from_external(nonce: BigUint, external: &ExternalTransaction) -> ProtocolResult<Self> {
        let operation = external.operation.clone().ok_or(BuilderError::IllegalBuilderState(
            "external transaction carries no operation data",
        ))?;

        let gas_price = match &external.gas_price {
            Some(price) if !price.is_zero() => price.clone(),
            _ => BigUint::one(),
        };

        let builder = TransactionBuilder {
            nonce,
            chain_id: BlockchainId::default(),
            gas_price,
            gas_coin: external.gas_coin.unwrap_or(BASE_COIN_ID),
            payload: Bytes::new(),
            service_data: Bytes::new(),
            operation: Some(operation),
        };
        builder.payload(external.payload.clone())
    }

    pub fn nonce(mut self, nonce: BigUint) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn chain_id(mut self, chain_id: BlockchainId) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Commission multiplier; an explicit zero falls back to the default
    /// of 1.
    pub fn gas_price(mut self, gas_price: BigUint) -> Self {
        self.gas_price = if gas_price.is_zero() {
            BigUint::one()
        } else {
            gas_price
        };
        self
    }

    pub fn gas_coin(mut self, gas_coin: CoinId) -> Self {
        self.gas_coin = gas_coin;
        self
    }

    /// Arbitrary user bytes, at most 1024. The bound is checked here, not
    /// at build time.
    pub fn payload(mut self, payload: Bytes) -> ProtocolResult<Self> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(BuilderError::PayloadTooLarge {
                size: payload.len(),
            }
            .into());
        }
        self.payload = payload;
        Ok(self)
    }

    /// Payload from a hex string, at most 2048 characters.
    pub fn payload_hex(self, hex_str: &str) -> ProtocolResult<Self> {
        if hex_str.len() > MAX_PAYLOAD_LEN * 2 {
            return Err(BuilderError::PayloadTooLarge {
                size: hex_str.len() / 2,
            }
            .into());
        }
        let raw = hex::decode(hex_str).map_err(TypesError::from)?;
        self.payload(Bytes::from(raw))
    }

    /// Payload from a UTF-8 string.
    pub fn payload_str(self, payload: &str) -> ProtocolResult<Self> {
        self.payload(Bytes::copy_from_slice(payload.as_bytes()))
    }

    pub fn service_data(mut self, service_data: Bytes) -> Self {
        self.service_data = service_data;
        self
    }

    fn build(self) -> ProtocolResult<Transaction> {
        let operation = self.operation.ok_or(BuilderError::IllegalBuilderState(
            "operation data must be set",
        ))?;

        let tx = Transaction {
            nonce: self.nonce,
            chain_id: self.chain_id,
            gas_price: self.gas_price,
            gas_coin: self.gas_coin,
            operation,
            payload: self.payload,
            service_data: self.service_data,
            signature_type: SignatureType::Single,
            signature: None,
        };

        let report = tx.validate();
        if !report.is_valid() {
            return Err(ValidationFailed(report).into());
        }
        Ok(tx)
    }

    /// Finishes a builder loaded through `from_external`.
    pub fn build_external(self) -> ProtocolResult<Transaction> {
        self.build()
    }

    pub fn send_coin(self) -> OperationBuilder<SendCoin> {
        OperationBuilder::new(self)
    }

    pub fn sell_coin(self) -> OperationBuilder<SellCoin> {
        OperationBuilder::new(self)
    }

    pub fn sell_all_coins(self) -> OperationBuilder<SellAllCoins> {
        OperationBuilder::new(self)
    }

    pub fn buy_coin(self) -> OperationBuilder<BuyCoin> {
        OperationBuilder::new(self)
    }

    pub fn create_coin(self) -> OperationBuilder<CreateCoin> {
        OperationBuilder::new(self)
    }

    pub fn declare_candidacy(self) -> OperationBuilder<DeclareCandidacy> {
        OperationBuilder::new(self)
    }

    pub fn delegate(self) -> OperationBuilder<Delegate> {
        OperationBuilder::new(self)
    }

    pub fn unbond(self) -> OperationBuilder<Unbond> {
        OperationBuilder::new(self)
    }

    pub fn redeem_check(self) -> OperationBuilder<RedeemCheck> {
        OperationBuilder::new(self)
    }

    pub fn set_candidate_online(self) -> OperationBuilder<SetCandidateOnline> {
        OperationBuilder::new(self)
    }

    pub fn set_candidate_offline(self) -> OperationBuilder<SetCandidateOffline> {
        OperationBuilder::new(self)
    }

    pub fn create_multisig_address(self) -> OperationBuilder<CreateMultisigAddress> {
        OperationBuilder::new(self)
    }

    pub fn multisend(self) -> OperationBuilder<Multisend> {
        OperationBuilder::new(self)
    }

    pub fn edit_candidate(self) -> OperationBuilder<EditCandidate> {
        OperationBuilder::new(self)
    }
}

/// Fluent field setting for one operation variant, finished back into the
/// parent transaction with `build`.
pub struct OperationBuilder<Op> {
    tx: TransactionBuilder,
    op: Op,
}

impl<Op: Default + Into<OperationData>> OperationBuilder<Op> {
    fn new(tx: TransactionBuilder) -> Self {
        OperationBuilder {
            tx,
            op: Op::default(),
        }
    }
}

impl<Op: Into<OperationData>> OperationBuilder<Op> {
    /// Validates the assembled transaction and produces it.
    pub fn build(mut self) -> ProtocolResult<Transaction> {
        self.tx.operation = Some(self.op.into());
        self.tx.build()
    }
}

impl OperationBuilder<SendCoin> {
    pub fn coin(mut self, coin: CoinId) -> Self {
        self.op.coin = coin;
        self
    }

    pub fn to(mut self, to: Address) -> Self {
        self.op.to = Some(to);
        self
    }

    /// Decimal amount, e.g. `"1.5"`.
    pub fn value(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.value = Some(normalize(decimal)?);
        Ok(self)
    }

    /// Amount already at the 10^18 wire scale.
    pub fn value_normalized(mut self, value: BigUint) -> Self {
        self.op.value = Some(value);
        self
    }
}

impl OperationBuilder<SellCoin> {
    pub fn coin_to_sell(mut self, coin: CoinId) -> Self {
        self.op.coin_to_sell = Some(coin);
        self
    }

    pub fn coin_to_buy(mut self, coin: CoinId) -> Self {
        self.op.coin_to_buy = Some(coin);
        self
    }

    pub fn value_to_sell(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.value_to_sell = Some(normalize(decimal)?);
        Ok(self)
    }

    pub fn min_value_to_buy(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.min_value_to_buy = Some(normalize(decimal)?);
        Ok(self)
    }
}

impl OperationBuilder<SellAllCoins> {
    pub fn coin_to_sell(mut self, coin: CoinId) -> Self {
        self.op.coin_to_sell = Some(coin);
        self
    }

    pub fn coin_to_buy(mut self, coin: CoinId) -> Self {
        self.op.coin_to_buy = Some(coin);
        self
    }

    pub fn min_value_to_buy(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.min_value_to_buy = Some(normalize(decimal)?);
        Ok(self)
    }
}

impl OperationBuilder<BuyCoin> {
    pub fn coin_to_buy(mut self, coin: CoinId) -> Self {
        self.op.coin_to_buy = Some(coin);
        self
    }

    pub fn coin_to_sell(mut self, coin: CoinId) -> Self {
        self.op.coin_to_sell = Some(coin);
        self
    }

    pub fn value_to_buy(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.value_to_buy = Some(normalize(decimal)?);
        Ok(self)
    }

    pub fn max_value_to_sell(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.max_value_to_sell = Some(normalize(decimal)?);
        Ok(self)
    }
}

impl OperationBuilder<CreateCoin> {
    pub fn name(mut self, name: &str) -> Self {
        self.op.name = name.to_owned();
        self
    }

    pub fn symbol(mut self, symbol: &str) -> Self {
        self.op.symbol = symbol.to_owned();
        self
    }

    pub fn initial_amount(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.initial_amount = Some(normalize(decimal)?);
        Ok(self)
    }

    pub fn initial_reserve(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.initial_reserve = Some(normalize(decimal)?);
        Ok(self)
    }

    pub fn constant_reserve_ratio(mut self, ratio: u32) -> Self {
        self.op.constant_reserve_ratio = ratio;
        self
    }

    pub fn max_supply(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.max_supply = Some(normalize(decimal)?);
        Ok(self)
    }
}

impl OperationBuilder<DeclareCandidacy> {
    pub fn address(mut self, address: Address) -> Self {
        self.op.address = Some(address);
        self
    }

    pub fn pub_key(mut self, pub_key: PublicKey) -> Self {
        self.op.pub_key = Some(pub_key);
        self
    }

    pub fn commission(mut self, commission: u32) -> Self {
        self.op.commission = commission;
        self
    }

    pub fn coin(mut self, coin: CoinId) -> Self {
        self.op.coin = coin;
        self
    }

    pub fn stake(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.stake = Some(normalize(decimal)?);
        Ok(self)
    }
}

impl OperationBuilder<Delegate> {
    pub fn pub_key(mut self, pub_key: PublicKey) -> Self {
        self.op.pub_key = Some(pub_key);
        self
    }

    pub fn coin(mut self, coin: CoinId) -> Self {
        self.op.coin = coin;
        self
    }

    pub fn stake(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.stake = Some(normalize(decimal)?);
        Ok(self)
    }
}

impl OperationBuilder<Unbond> {
    pub fn pub_key(mut self, pub_key: PublicKey) -> Self {
        self.op.pub_key = Some(pub_key);
        self
    }

    pub fn coin(mut self, coin: CoinId) -> Self {
        self.op.coin = coin;
        self
    }

    pub fn value(mut self, decimal: &str) -> ProtocolResult<Self> {
        self.op.value = Some(normalize(decimal)?);
        Ok(self)
    }
}

impl OperationBuilder<RedeemCheck> {
    pub fn raw_check(mut self, raw_check: Bytes) -> Self {
        self.op.raw_check = raw_check;
        self
    }

    pub fn proof(mut self, proof: Bytes) -> Self {
        self.op.proof = proof;
        self
    }
}

impl OperationBuilder<SetCandidateOnline> {
    pub fn pub_key(mut self, pub_key: PublicKey) -> Self {
        self.op.pub_key = Some(pub_key);
        self
    }
}

impl OperationBuilder<SetCandidateOffline> {
    pub fn pub_key(mut self, pub_key: PublicKey) -> Self {
        self.op.pub_key = Some(pub_key);
        self
    }
}

impl OperationBuilder<CreateMultisigAddress> {
    pub fn threshold(mut self, threshold: u64) -> Self {
        self.op.threshold = threshold;
        self
    }

    /// Adds one participant with its vote weight; call order defines the
    /// wire order.
    pub fn participant(mut self, address: Address, weight: u64) -> Self {
        self.op.addresses.push(address);
        self.op.weights.push(weight);
        self
    }
}

impl OperationBuilder<Multisend> {
    /// Adds one send item; call order defines the wire order.
    pub fn item(mut self, coin: CoinId, to: Address, decimal: &str) -> ProtocolResult<Self> {
        self.op.items.push(SendCoin {
            coin,
            to: Some(to),
            value: Some(normalize(decimal)?),
        });
        Ok(self)
    }
}

impl OperationBuilder<EditCandidate> {
    pub fn pub_key(mut self, pub_key: PublicKey) -> Self {
        self.op.pub_key = Some(pub_key);
        self
    }

    pub fn reward_address(mut self, address: Address) -> Self {
        self.op.reward_address = Some(address);
        self
    }

    pub fn owner_address(mut self, address: Address) -> Self {
        self.op.owner_address = Some(address);
        self
    }
}
