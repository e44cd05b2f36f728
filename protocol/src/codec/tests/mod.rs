
use bytes::Bytes;
use num_bigint::BigUint;
use rand::{Rng, RngCore};

use tern_crypto::PrivateKey;

use crate::builder::TransactionBuilder;
use crate::types::{
    Address, BlockchainId, BuyCoin, CreateCoin, CreateMultisigAddress, DeclareCandidacy,
    Delegate, EditCandidate, ExternalTransaction, Multisend, OperationData, PublicKey,
    RedeemCheck, SellAllCoins, SellCoin, SendCoin, SetCandidateOffline, SetCandidateOnline,
    Transaction, Unbond,
};

fn mock_address() -> Address {
    Address::from_hex("0xd82558ea00eb81d35f2654953598f5d51737d31d").unwrap()
}

fn mock_address2() -> Address {
    Address::from_hex("0x89e5dc185e6bab772ac8e00cf3fb3f4cb0931c47").unwrap()
}

fn mock_pub_key() -> PublicKey {
    PublicKey::from_hex("0x0eb98ea04ae466d8d38f490db3c99b3996a90e24243952ce9822c6dc1e2c1a43")
        .unwrap()
}

fn mock_privkey() -> PrivateKey {
    PrivateKey::from_hex("05ddcd4e6f7d248ed1388f0091fe345bf9bf4fc2390384e26005e7675c98b3c1")
        .unwrap()
}

fn mock_amount(n: u64) -> Option<BigUint> {
    Some(BigUint::from(n) * BigUint::from(1_000_000_000_000_000_000u64))
}

fn mock_send_coin() -> OperationData {
    SendCoin {
        coin:  0,
        to:    Some(mock_address()),
        value: mock_amount(15),
    }
    .into()
}

fn mock_sell_coin() -> OperationData {
    SellCoin {
        coin_to_sell:     Some(0),
        value_to_sell:    mock_amount(2),
        coin_to_buy:      Some(3),
        min_value_to_buy: mock_amount(1),
    }
    .into()
}

fn mock_sell_all_coins() -> OperationData {
    SellAllCoins {
        coin_to_sell:     Some(4),
        coin_to_buy:      Some(0),
        min_value_to_buy: mock_amount(9),
    }
    .into()
}

fn mock_buy_coin() -> OperationData {
    BuyCoin {
        coin_to_buy:       Some(5),
        value_to_buy:      mock_amount(3),
        coin_to_sell:      Some(0),
        max_value_to_sell: mock_amount(30),
    }
    .into()
}

fn mock_create_coin() -> OperationData {
    CreateCoin {
        name: "Super Coin".to_owned(),
        symbol: "SPRCN".to_owned(),
        initial_amount: mock_amount(1000),
        initial_reserve: mock_amount(500),
        constant_reserve_ratio: 55,
        max_supply: mock_amount(1_000_000),
    }
    .into()
}

fn mock_declare_candidacy() -> OperationData {
    DeclareCandidacy {
        address: Some(mock_address()),
        pub_key: Some(mock_pub_key()),
        commission: 10,
        coin: 0,
        stake: mock_amount(100),
    }
    .into()
}

fn mock_delegate() -> OperationData {
    Delegate {
        pub_key: Some(mock_pub_key()),
        coin:    0,
        stake:   mock_amount(7),
    }
    .into()
}

fn mock_unbond() -> OperationData {
    Unbond {
        pub_key: Some(mock_pub_key()),
        coin:    0,
        value:   mock_amount(7),
    }
    .into()
}

fn mock_redeem_check() -> OperationData {
    RedeemCheck {
        raw_check: Bytes::from(vec![0xAAu8; 48]),
        proof:     Bytes::from(vec![0xBBu8; 65]),
    }
    .into()
}

fn mock_set_candidate_online() -> OperationData {
    SetCandidateOnline {
        pub_key: Some(mock_pub_key()),
    }
    .into()
}

fn mock_set_candidate_offline() -> OperationData {
    SetCandidateOffline {
        pub_key: Some(mock_pub_key()),
    }
    .into()
}

fn mock_create_multisig_address() -> OperationData {
    CreateMultisigAddress {
        threshold: 2,
        weights:   vec![1, 2],
        addresses: vec![mock_address(), mock_address2()],
    }
    .into()
}

fn mock_multisend() -> OperationData {
    Multisend {
        items: vec![
            SendCoin {
                coin:  0,
                to:    Some(mock_address()),
                value: mock_amount(1),
            },
            SendCoin {
                coin:  3,
                to:    Some(mock_address2()),
                value: mock_amount(2),
            },
        ],
    }
    .into()
}

fn mock_edit_candidate() -> OperationData {
    EditCandidate {
        pub_key:        Some(mock_pub_key()),
        reward_address: Some(mock_address()),
        owner_address:  Some(mock_address2()),
    }
    .into()
}

macro_rules! test_op_codec {
    ($($mock_func:ident),+) => {
        $(
            {
                let before_val = $mock_func();
                let body = before_val.encode();
                let after_val = OperationData::decode(before_val.op_type(), &body).unwrap();
                assert_eq!(before_val, after_val);
            }
        )+
    };
}

#[test]
fn test_operation_codec() {
    test_op_codec![
        mock_send_coin,
        mock_sell_coin,
        mock_sell_all_coins,
        mock_buy_coin,
        mock_create_coin,
        mock_declare_candidacy,
        mock_delegate,
        mock_unbond,
        mock_redeem_check,
        mock_set_candidate_online,
        mock_set_candidate_offline,
        mock_create_multisig_address,
        mock_multisend,
        mock_edit_candidate
    ];
}

fn mock_signed_tx(operation: OperationData) -> Transaction {
    let external = ExternalTransaction {
        operation: Some(operation),
        payload:   Bytes::new(),
        gas_price: None,
        gas_coin:  Some(0),
    };

    let mut tx = TransactionBuilder::from_external(BigUint::from(128u64), &external)
        .unwrap()
        .chain_id(BlockchainId::TestNet)
        .payload_str("round trip")
        .unwrap()
        .build_external()
        .unwrap();
    tx.sign_single(&mock_privkey()).unwrap();
    tx
}

#[test]
fn test_signed_envelope_round_trip() {
    for mock in &[
        mock_send_coin,
        mock_sell_coin,
        mock_sell_all_coins,
        mock_buy_coin,
        mock_create_coin,
        mock_declare_candidacy,
        mock_delegate,
        mock_unbond,
        mock_redeem_check,
        mock_set_candidate_online,
        mock_set_candidate_offline,
        mock_create_multisig_address,
        mock_multisend,
        mock_edit_candidate,
    ] {
        let tx = mock_signed_tx(mock());
        let encoded = tx.encode_signed().unwrap();
        let decoded = Transaction::decode(&encoded).unwrap();
        assert_eq!(tx, decoded);
    }
}

#[test]
fn test_multi_signed_round_trip() {
    let keys = vec![
        PrivateKey::from_hex("33671c8f2363dffb45e166f1cbcb9ac8b05f626e80864f5e0e0a115eb086d6f7")
            .unwrap(),
        PrivateKey::from_hex("39797c0d33dfd1c0f2c22c5d5e42ee0ec3a5338bdfecb5dea4fd6a735a9a0b33")
            .unwrap(),
    ];

    let mut tx = TransactionBuilder::new(BigUint::from(1u64))
        .chain_id(BlockchainId::TestNet)
        .send_coin()
        .to(mock_address())
        .value("1.5")
        .unwrap()
        .build()
        .unwrap();
    tx.sign_multi(mock_address2(), &keys).unwrap();

    let encoded = tx.encode_signed().unwrap();
    let decoded = Transaction::decode(&encoded).unwrap();
    assert_eq!(tx, decoded);
}

#[test]
fn test_random_payload_round_trip() {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(1, 1024);
    let mut payload = vec![0u8; len];
    rng.fill_bytes(&mut payload);

    let mut tx = TransactionBuilder::new(BigUint::from(3u64))
        .payload(Bytes::from(payload))
        .unwrap()
        .send_coin()
        .to(mock_address())
        .value("0.1")
        .unwrap()
        .build()
        .unwrap();
    tx.sign_single(&mock_privkey()).unwrap();

    let decoded = Transaction::decode(&tx.encode_signed().unwrap()).unwrap();
    assert_eq!(tx, decoded);
}
