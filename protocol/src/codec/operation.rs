//! RLP layouts of the operation variants. Field order per variant is the
//! wire contract; amounts are minimal big-endian byte strings.

use bytes::BytesMut;
use rlp::{DecoderError, Rlp, RlpStream};

use crate::codec::{append_uint_opt, uint_at, CodecError};
use crate::types::{
    Address, BuyCoin, CreateCoin, CreateMultisigAddress, DeclareCandidacy, Delegate,
    EditCandidate, Multisend, OperationData, OperationType, PublicKey, RedeemCheck, SellAllCoins,
    SellCoin, SendCoin, SetCandidateOffline, SetCandidateOnline, Unbond,
};

impl rlp::Encodable for Address {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.append(&self.as_bytes().to_vec());
    }
}

impl rlp::Decodable for Address {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Address::from_bytes(BytesMut::from(r.data()?).freeze())
            .map_err(|_| DecoderError::RlpInvalidLength)
    }
}

impl rlp::Encodable for PublicKey {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.append(&self.as_bytes().to_vec());
    }
}

impl rlp::Decodable for PublicKey {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        PublicKey::from_bytes(BytesMut::from(r.data()?).freeze())
            .map_err(|_| DecoderError::RlpInvalidLength)
    }
}

fn append_coin_opt(s: &mut RlpStream, coin: Option<u64>) {
    match coin {
        Some(coin) => s.append(&coin),
        None => s.append_empty_data(),
    };
}

fn append_opt<E: rlp::Encodable>(s: &mut RlpStream, v: Option<&E>) {
    match v {
        Some(v) => s.append(v),
        None => s.append_empty_data(),
    };
}

// [coin, to, value]
impl rlp::Encodable for SendCoin {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.coin);
        append_opt(s, self.to.as_ref());
        append_uint_opt(s, self.value.as_ref());
    }
}

impl rlp::Decodable for SendCoin {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(SendCoin {
            coin:  r.at(0)?.as_val()?,
            to:    Some(r.at(1)?.as_val()?),
            value: Some(uint_at(r, 2)?),
        })
    }
}

// [coin_to_sell, value_to_sell, coin_to_buy, min_value_to_buy]
impl rlp::Encodable for SellCoin {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(4);
        append_coin_opt(s, self.coin_to_sell);
        append_uint_opt(s, self.value_to_sell.as_ref());
        append_coin_opt(s, self.coin_to_buy);
        append_uint_opt(s, self.min_value_to_buy.as_ref());
    }
}

impl rlp::Decodable for SellCoin {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(SellCoin {
            coin_to_sell:     Some(r.at(0)?.as_val()?),
            value_to_sell:    Some(uint_at(r, 1)?),
            coin_to_buy:      Some(r.at(2)?.as_val()?),
            min_value_to_buy: Some(uint_at(r, 3)?),
        })
    }
}

// [coin_to_sell, coin_to_buy, min_value_to_buy]
impl rlp::Encodable for SellAllCoins {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        append_coin_opt(s, self.coin_to_sell);
        append_coin_opt(s, self.coin_to_buy);
        append_uint_opt(s, self.min_value_to_buy.as_ref());
    }
}

impl rlp::Decodable for SellAllCoins {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(SellAllCoins {
            coin_to_sell:     Some(r.at(0)?.as_val()?),
            coin_to_buy:      Some(r.at(1)?.as_val()?),
            min_value_to_buy: Some(uint_at(r, 2)?),
        })
    }
}

// [coin_to_buy, value_to_buy, coin_to_sell, max_value_to_sell]
impl rlp::Encodable for BuyCoin {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(4);
        append_coin_opt(s, self.coin_to_buy);
        append_uint_opt(s, self.value_to_buy.as_ref());
        append_coin_opt(s, self.coin_to_sell);
        append_uint_opt(s, self.max_value_to_sell.as_ref());
    }
}

impl rlp::Decodable for BuyCoin {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(BuyCoin {
            coin_to_buy:       Some(r.at(0)?.as_val()?),
            value_to_buy:      Some(uint_at(r, 1)?),
            coin_to_sell:      Some(r.at(2)?.as_val()?),
            max_value_to_sell: Some(uint_at(r, 3)?),
        })
    }
}

// [name, symbol, initial_amount, initial_reserve, crr, max_supply]
impl rlp::Encodable for CreateCoin {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(6);
        s.append(&self.name);
        s.append(&self.symbol);
        append_uint_opt(s, self.initial_amount.as_ref());
        append_uint_opt(s, self.initial_reserve.as_ref());
        s.append(&u64::from(self.constant_reserve_ratio));
        append_uint_opt(s, self.max_supply.as_ref());
    }
}

impl rlp::Decodable for CreateCoin {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        let crr: u64 = r.at(4)?.as_val()?;
        Ok(CreateCoin {
            name: r.at(0)?.as_val()?,
            symbol: r.at(1)?.as_val()?,
            initial_amount: Some(uint_at(r, 2)?),
            initial_reserve: Some(uint_at(r, 3)?),
            constant_reserve_ratio: crr as u32,
            max_supply: Some(uint_at(r, 5)?),
        })
    }
}

// [address, pub_key, commission, coin, stake]
impl rlp::Encodable for DeclareCandidacy {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(5);
        append_opt(s, self.address.as_ref());
        append_opt(s, self.pub_key.as_ref());
        s.append(&u64::from(self.commission));
        s.append(&self.coin);
        append_uint_opt(s, self.stake.as_ref());
    }
}

impl rlp::Decodable for DeclareCandidacy {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        let commission: u64 = r.at(2)?.as_val()?;
        Ok(DeclareCandidacy {
            address: Some(r.at(0)?.as_val()?),
            pub_key: Some(r.at(1)?.as_val()?),
            commission: commission as u32,
            coin: r.at(3)?.as_val()?,
            stake: Some(uint_at(r, 4)?),
        })
    }
}

// [pub_key, coin, stake]
impl rlp::Encodable for Delegate {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        append_opt(s, self.pub_key.as_ref());
        s.append(&self.coin);
        append_uint_opt(s, self.stake.as_ref());
    }
}

impl rlp::Decodable for Delegate {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(Delegate {
            pub_key: Some(r.at(0)?.as_val()?),
            coin:    r.at(1)?.as_val()?,
            stake:   Some(uint_at(r, 2)?),
        })
    }
}

// [pub_key, coin, value]
impl rlp::Encodable for Unbond {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        append_opt(s, self.pub_key.as_ref());
        s.append(&self.coin);
        append_uint_opt(s, self.value.as_ref());
    }
}

impl rlp::Decodable for Unbond {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(Unbond {
            pub_key: Some(r.at(0)?.as_val()?),
            coin:    r.at(1)?.as_val()?,
            value:   Some(uint_at(r, 2)?),
        })
    }
}

// [raw_check, proof]
impl rlp::Encodable for RedeemCheck {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.raw_check.to_vec());
        s.append(&self.proof.to_vec());
    }
}

impl rlp::Decodable for RedeemCheck {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(RedeemCheck {
            raw_check: BytesMut::from(r.at(0)?.data()?).freeze(),
            proof:     BytesMut::from(r.at(1)?.data()?).freeze(),
        })
    }
}

// [pub_key]
impl rlp::Encodable for SetCandidateOnline {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(1);
        append_opt(s, self.pub_key.as_ref());
    }
}

impl rlp::Decodable for SetCandidateOnline {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(SetCandidateOnline {
            pub_key: Some(r.at(0)?.as_val()?),
        })
    }
}

// [pub_key]
impl rlp::Encodable for SetCandidateOffline {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(1);
        append_opt(s, self.pub_key.as_ref());
    }
}

impl rlp::Decodable for SetCandidateOffline {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(SetCandidateOffline {
            pub_key: Some(r.at(0)?.as_val()?),
        })
    }
}

// [threshold, [weights...], [addresses...]]
impl rlp::Encodable for CreateMultisigAddress {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.threshold);
        s.append_list(&self.weights);
        s.append_list(&self.addresses);
    }
}

impl rlp::Decodable for CreateMultisigAddress {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(CreateMultisigAddress {
            threshold: r.at(0)?.as_val()?,
            weights:   r.at(1)?.as_list()?,
            addresses: r.at(2)?.as_list()?,
        })
    }
}

// [[item, ...]] where each item is a SendCoin triple
impl rlp::Encodable for Multisend {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(1);
        s.append_list(&self.items);
    }
}

impl rlp::Decodable for Multisend {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(Multisend {
            items: r.at(0)?.as_list()?,
        })
    }
}

// [pub_key, reward_address, owner_address]
impl rlp::Encodable for EditCandidate {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        append_opt(s, self.pub_key.as_ref());
        append_opt(s, self.reward_address.as_ref());
        append_opt(s, self.owner_address.as_ref());
    }
}

impl rlp::Decodable for EditCandidate {
    fn decode(r: &Rlp) -> Result<Self, DecoderError> {
        Ok(EditCandidate {
            pub_key:        Some(r.at(0)?.as_val()?),
            reward_address: Some(r.at(1)?.as_val()?),
            owner_address:  Some(r.at(2)?.as_val()?),
        })
    }
}

impl OperationData {
    /// Encodes exactly this variant's field list.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            OperationData::SendCoin(op) => rlp::encode(op),
            OperationData::SellCoin(op) => rlp::encode(op),
            OperationData::SellAllCoins(op) => rlp::encode(op),
            OperationData::BuyCoin(op) => rlp::encode(op),
            OperationData::CreateCoin(op) => rlp::encode(op),
            OperationData::DeclareCandidacy(op) => rlp::encode(op),
            OperationData::Delegate(op) => rlp::encode(op),
            OperationData::Unbond(op) => rlp::encode(op),
            OperationData::RedeemCheck(op) => rlp::encode(op),
            OperationData::SetCandidateOnline(op) => rlp::encode(op),
            OperationData::SetCandidateOffline(op) => rlp::encode(op),
            OperationData::CreateMultisigAddress(op) => rlp::encode(op),
            OperationData::Multisend(op) => rlp::encode(op),
            OperationData::EditCandidate(op) => rlp::encode(op),
        }
    }

    /// Decodes the variant selected by `op_type` from its nested body.
    pub fn decode(op_type: OperationType, body: &[u8]) -> Result<Self, CodecError> {
        let op = match op_type {
            OperationType::SendCoin => OperationData::SendCoin(rlp::decode(body)?),
            OperationType::SellCoin => OperationData::SellCoin(rlp::decode(body)?),
            OperationType::SellAllCoins => OperationData::SellAllCoins(rlp::decode(body)?),
            OperationType::BuyCoin => OperationData::BuyCoin(rlp::decode(body)?),
            OperationType::CreateCoin => OperationData::CreateCoin(rlp::decode(body)?),
            OperationType::DeclareCandidacy => OperationData::DeclareCandidacy(rlp::decode(body)?),
            OperationType::Delegate => OperationData::Delegate(rlp::decode(body)?),
            OperationType::Unbond => OperationData::Unbond(rlp::decode(body)?),
            OperationType::RedeemCheck => OperationData::RedeemCheck(rlp::decode(body)?),
            OperationType::SetCandidateOnline => {
                OperationData::SetCandidateOnline(rlp::decode(body)?)
            }
            OperationType::SetCandidateOffline => {
                OperationData::SetCandidateOffline(rlp::decode(body)?)
            }
            OperationType::CreateMultisigAddress => {
                OperationData::CreateMultisigAddress(rlp::decode(body)?)
            }
            OperationType::Multisend => OperationData::Multisend(rlp::decode(body)?),
            OperationType::EditCandidate => OperationData::EditCandidate(rlp::decode(body)?),
        };
        Ok(op)
    }
}
