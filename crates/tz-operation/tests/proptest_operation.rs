use proptest::prelude::*;

use tz_operation::amount::{tez_to_mutez, to_minor_units};
use tz_operation::builder::build_transfer;
use tz_operation::forge::{forge, parse, verify_forge};
use tz_operation::micheline::{codec, Micheline};
use tz_operation::{
    AccountState, ForgedOperation, ManagerFields, OperationContent, TransactionParameters,
    TransferItem,
};
use tz_primitives::base58::{b58c_encode, Prefix};

fn arb_implicit() -> impl Strategy<Value = String> {
    (
        prop::array::uniform20(any::<u8>()),
        prop_oneof![
            Just(Prefix::Ed25519PublicKeyHash),
            Just(Prefix::Secp256k1PublicKeyHash),
            Just(Prefix::P256PublicKeyHash),
        ],
    )
        .prop_map(|(hash, kind)| b58c_encode(&hash, kind))
}

fn arb_destination() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_implicit(),
        prop::array::uniform20(any::<u8>()).prop_map(|h| b58c_encode(&h, Prefix::ContractHash)),
    ]
}

fn arb_manager() -> impl Strategy<Value = ManagerFields> {
    (arb_implicit(), any::<u64>(), any::<u64>(), 0u64..1_040_000, 0u64..60_000).prop_map(
        |(source, fee, counter, gas_limit, storage_limit)| ManagerFields {
            source,
            fee,
            counter,
            gas_limit,
            storage_limit,
        },
    )
}

fn arb_micheline() -> impl Strategy<Value = Micheline> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Micheline::int),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Micheline::string),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(|b| Micheline::bytes(hex::encode(b))),
        Just(Micheline::prim("Unit")),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Micheline::seq),
            (inner.clone(), inner).prop_map(|(l, r)| Micheline::pair(l, r)),
        ]
    })
}

fn arb_content() -> impl Strategy<Value = OperationContent> {
    let transaction = (
        arb_manager(),
        any::<u64>(),
        arb_destination(),
        prop::option::of(("[a-z_]{1,20}", arb_micheline())),
    )
        .prop_map(|(manager, amount, destination, params)| OperationContent::Transaction {
            manager,
            amount,
            destination,
            parameters: params
                .map(|(entrypoint, value)| TransactionParameters { entrypoint, value })
                .filter(|p| !(p.entrypoint == "default" && p.value == Micheline::prim("Unit"))),
        });
    let delegation = (arb_manager(), prop::option::of(arb_implicit()))
        .prop_map(|(manager, delegate)| OperationContent::Delegation { manager, delegate });
    prop_oneof![transaction, delegation]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn forge_parse_roundtrip(
        branch in prop::array::uniform32(any::<u8>()),
        contents in prop::collection::vec(arb_content(), 1..4),
    ) {
        let op = ForgedOperation::new(b58c_encode(&branch, Prefix::BlockHash), contents);
        let bytes = forge(&op).unwrap();
        prop_assert_eq!(parse(&bytes).unwrap(), op.clone());
        prop_assert!(verify_forge(&hex::encode(&bytes), &op).is_ok());
    }

    #[test]
    fn micheline_binary_roundtrip(value in arb_micheline()) {
        let bytes = codec::encode(&value).unwrap();
        prop_assert_eq!(codec::decode(&bytes).unwrap(), value);
    }

    #[test]
    fn transfer_counters_are_sequential(
        counter in 0u64..1_000_000,
        n in 1usize..8,
        fee in 0u64..100_000_000,
    ) {
        let pkh = b58c_encode(&[7u8; 20], Prefix::Ed25519PublicKeyHash);
        let state = AccountState {
            branch: b58c_encode(&[0u8; 32], Prefix::BlockHash),
            counter,
            revealed: true,
            pkh: pkh.clone(),
            public_key: None,
        };
        let items: Vec<TransferItem> = (0..n)
            .map(|i| TransferItem {
                destination: b58c_encode(&[i as u8; 20], Prefix::Ed25519PublicKeyHash),
                amount: "1".to_string(),
                gas_limit: 10300,
                storage_limit: 257,
                parameters: None,
            })
            .collect();
        let op = build_transfer(&state, &pkh, &items, fee, None).unwrap();
        prop_assert_eq!(op.contents.len(), n);
        for (i, content) in op.contents.iter().enumerate() {
            let manager = content.manager().unwrap();
            prop_assert_eq!(manager.counter, counter + 1 + i as u64);
            prop_assert_eq!(manager.fee, if i == n - 1 { fee } else { 0 });
        }
    }

    #[test]
    fn whole_mutez_amounts_convert(mutez in 0u64..10_000_000_000_000) {
        let text = format!("{}.{:06}", mutez / 1_000_000, mutez % 1_000_000);
        prop_assert_eq!(tez_to_mutez(&text).unwrap(), mutez);
    }

    #[test]
    fn excess_precision_is_rejected(units in 0u64..1_000_000, digit in 1u8..10, decimals in 0u32..8) {
        let text = format!("{units}.{}{digit}", "0".repeat(decimals as usize));
        prop_assert!(to_minor_units(&text, decimals).is_err());
    }
}
