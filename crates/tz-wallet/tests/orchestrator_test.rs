//! End-to-end tests of the operation pipeline against a stubbed node.

use std::sync::Arc;
use std::time::Duration;

use ed25519_dalek::Signer;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use tz_operation::forge::forge_hex;
use tz_operation::micheline::Micheline;
use tz_operation::{
    Asset, BatchItem, ForgedOperation, Limits, ManagerFields, OperationContent, Script,
    StaticAssets, TokenStandard, TransferItem,
};
use tz_primitives::base58::{b58c_encode, Prefix};
use tz_primitives::hash::blake2b_256;
use tz_primitives::keys::PublicKeyPoint;
use tz_primitives::signer::{hexsig_to_edsig, sign, verify};
use tz_primitives::util::hex_to_bytes;
use tz_primitives::{KeyPair, SecretKey, Watermark};
use tz_rpc::{RpcConfig, RpcGateway};
use tz_wallet::keys::secp256k1_key_pair;
use tz_wallet::{
    KeyLookup, KeyLookupAnswer, KeyLookupService, OperationService, Outcome, Submitted,
    WalletConfig, WalletError, PLACEHOLDER_SIGNATURE,
};

const PROTOCOL: &str = "PtParisBxoLz5gzMmn3d9WBQNoPSZakgnkMC2VNuQ3KXfUtUQeZ";
const CHAIN_ID: &str = "NetXdQprcVkpaWU";
const OP_HASH: &str = "ooHcT8UYjkYkVrxZJ2UbrxGTZz8RXbFWBxpDLzBGBVsKqjzFmhB";

const FORGE_PATH: &str = "/chains/main/blocks/head/helpers/forge/operations";
const PREAPPLY_PATH: &str = "/chains/main/blocks/head/helpers/preapply/operations";
const SIMULATE_PATH: &str = "/chains/main/blocks/head/helpers/scripts/simulate_operation";
const INJECT_PATH: &str = "/injection/operation";

/// Forges the posted operation with the local forger, optionally
/// corrupting the answer the way a dishonest node would.
struct LocalForger {
    tamper: bool,
}

impl Respond for LocalForger {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let op: ForgedOperation = serde_json::from_slice(&request.body).unwrap();
        let mut forged = forge_hex(&op).unwrap();
        if self.tamper {
            let last = forged.pop().unwrap();
            forged.push(if last == '0' { '1' } else { '0' });
        }
        ResponseTemplate::new(200).set_body_json(json!(forged))
    }
}

fn branch() -> String {
    b58c_encode(&[0u8; 32], Prefix::BlockHash)
}

fn recipient() -> String {
    b58c_encode(&[3u8; 20], Prefix::Ed25519PublicKeyHash)
}

fn signer() -> KeyPair {
    KeyPair::from_secret_key(SecretKey::from_ed25519_seed(&[7u8; 32]))
}

fn service(server: &MockServer) -> OperationService {
    let gateway = RpcGateway::new(RpcConfig {
        endpoints: vec![server.uri()],
        retry_delay: Duration::from_millis(10),
        ..RpcConfig::default()
    });
    OperationService::new(gateway, WalletConfig::default())
}

fn transfer_item(amount: &str) -> TransferItem {
    TransferItem {
        destination: recipient(),
        amount: amount.to_string(),
        gas_limit: 10300,
        storage_limit: 257,
        parameters: None,
    }
}

fn applied(kind: &str, result: Value) -> Value {
    json!([{"contents": [{"kind": kind, "metadata": {"operation_result": result}}]}])
}

async fn mount_get(server: &MockServer, at: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_post(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Header, counter 10 and the manager key of `keys` (or null).
async fn mount_account(server: &MockServer, keys: &KeyPair, revealed: bool) {
    mount_get(
        server,
        "/chains/main/blocks/head~3/header",
        json!({"hash": branch(), "chain_id": CHAIN_ID, "protocol": PROTOCOL, "level": 100}),
    )
    .await;
    let contract = format!("/chains/main/blocks/head/context/contracts/{}", keys.pkh());
    mount_get(server, &format!("{contract}/counter"), json!("10")).await;
    let manager_key = if revealed { json!(keys.pk_b58()) } else { Value::Null };
    mount_get(server, &format!("{contract}/manager_key"), manager_key).await;
}

async fn mount_forger(server: &MockServer, tamper: bool) {
    Mock::given(method("POST"))
        .and(path(FORGE_PATH))
        .respond_with(LocalForger { tamper })
        .mount(server)
        .await;
}

async fn mount_submission(server: &MockServer, kind: &str) {
    mount_forger(server, false).await;
    mount_post(
        server,
        PREAPPLY_PATH,
        ResponseTemplate::new(200).set_body_json(applied(kind, json!({"status": "applied"}))),
    )
    .await;
    mount_post(server, INJECT_PATH, ResponseTemplate::new(200).set_body_json(json!(OP_HASH))).await;
}

async fn bodies(server: &MockServer, suffix: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == suffix)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

fn failure<T: std::fmt::Debug>(outcome: Outcome<T>) -> tz_wallet::FailurePayload {
    outcome.into_result().unwrap_err()
}

#[tokio::test]
async fn test_transfer_is_signed_preapplied_and_injected() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_account(&server, &keys, true).await;
    mount_submission(&server, "transaction").await;

    let outcome = service(&server)
        .transfer(keys.pkh(), &[transfer_item("1.5")], "0.001", &keys, None)
        .await;
    assert_eq!(
        outcome.into_result().unwrap(),
        Submitted::Injected {
            op_hash: OP_HASH.to_string(),
            new_kt1s: vec![]
        }
    );

    let preapplied = bodies(&server, PREAPPLY_PATH).await;
    let op = &preapplied[0][0];
    assert_eq!(op["protocol"], PROTOCOL);
    let contents = op["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0]["kind"], "transaction");
    assert_eq!(contents[0]["amount"], "1500000");
    assert_eq!(contents[0]["fee"], "1000");
    assert_eq!(contents[0]["counter"], "11");

    let injected = bodies(&server, INJECT_PATH).await;
    let signed_hex = injected[0].as_str().unwrap();
    let (forged, signature) = signed_hex.split_at(signed_hex.len() - 128);
    let edsig = hexsig_to_edsig(signature).unwrap();
    assert_eq!(op["signature"], edsig.as_str());
    assert!(verify(
        &Watermark::GenericOperation.apply(&hex_to_bytes(forged).unwrap()),
        &edsig,
        &keys.pk_b58().unwrap()
    ));
}

#[tokio::test]
async fn test_unrevealed_account_gets_reveal_first() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_account(&server, &keys, false).await;
    mount_submission(&server, "transaction").await;

    let outcome = service(&server)
        .transfer(keys.pkh(), &[transfer_item("2")], "0.002", &keys, None)
        .await;
    assert!(outcome.is_success());

    let preapplied = bodies(&server, PREAPPLY_PATH).await;
    let contents = preapplied[0][0]["contents"].as_array().unwrap();
    assert_eq!(contents[0]["kind"], "reveal");
    assert_eq!(contents[0]["counter"], "11");
    assert_eq!(contents[0]["fee"], "0");
    assert_eq!(contents[1]["counter"], "12");
    assert_eq!(contents[1]["fee"], "2000");
}

#[tokio::test]
async fn test_fee_above_cap_fails_before_any_request() {
    let server = MockServer::start().await;
    let keys = signer();

    let outcome = service(&server)
        .transfer(keys.pkh(), &[transfer_item("1")], "150", &keys, None)
        .await;
    let payload = failure(outcome);
    assert_eq!(payload.msg, "TooHighFee");
    assert_eq!(payload.error_id, None);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_forge_mismatch_is_never_signed() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_account(&server, &keys, true).await;
    mount_forger(&server, true).await;

    let outcome = service(&server)
        .transfer(keys.pkh(), &[transfer_item("1")], "0.001", &keys, None)
        .await;
    assert_eq!(failure(outcome).msg, "ValidationError");
    assert!(bodies(&server, PREAPPLY_PATH).await.is_empty());
    assert!(bodies(&server, INJECT_PATH).await.is_empty());
}

#[tokio::test]
async fn test_without_secret_key_simulates_and_returns_bytes() {
    let server = MockServer::start().await;
    let keys = signer().without_secret();
    mount_account(&server, &keys, true).await;
    mount_forger(&server, false).await;
    mount_post(
        &server,
        SIMULATE_PATH,
        ResponseTemplate::new(200)
            .set_body_json(applied("transaction", json!({"status": "applied"}))[0].clone()),
    )
    .await;

    let outcome = service(&server)
        .transfer(keys.pkh(), &[transfer_item("1")], "0.001", &keys, None)
        .await;
    let Submitted::Unsigned { unsigned_operation } = outcome.into_result().unwrap() else {
        panic!("expected unsigned bytes");
    };

    let simulated = bodies(&server, SIMULATE_PATH).await;
    assert_eq!(simulated[0]["chain_id"], CHAIN_ID);
    assert_eq!(simulated[0]["operation"]["signature"], PLACEHOLDER_SIGNATURE);
    let op: ForgedOperation = serde_json::from_value(simulated[0]["operation"].clone()).unwrap();
    assert_eq!(unsigned_operation, forge_hex(&op).unwrap());
    assert!(bodies(&server, INJECT_PATH).await.is_empty());
}

#[tokio::test]
async fn test_token_amount_beyond_decimals() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_account(&server, &keys, true).await;
    let assets = StaticAssets::new().with(
        "TOK",
        Asset {
            standard: TokenStandard::Fa2,
            decimals: 2,
            contract_address: b58c_encode(&[9u8; 20], Prefix::ContractHash),
            token_id: "0".to_string(),
        },
    );

    let outcome = service(&server)
        .with_assets(Arc::new(assets))
        .transfer(keys.pkh(), &[transfer_item("1.005")], "0.001", &keys, Some("TOK"))
        .await;
    assert_eq!(failure(outcome).msg, "the amount 1.005 is not within 2 decimals");
    assert!(bodies(&server, FORGE_PATH).await.is_empty());
}

#[tokio::test]
async fn test_unknown_token() {
    let server = MockServer::start().await;
    let keys = signer();

    let outcome = service(&server)
        .transfer(keys.pkh(), &[transfer_item("1")], "0.001", &keys, Some("NOPE"))
        .await;
    assert_eq!(failure(outcome).msg, "UnknownAsset");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_preapply_failure_reports_balance_too_low() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_account(&server, &keys, true).await;
    mount_forger(&server, false).await;
    mount_post(
        &server,
        PREAPPLY_PATH,
        ResponseTemplate::new(200).set_body_json(applied(
            "transaction",
            json!({
                "status": "failed",
                "errors": [
                    {"kind": "temporary", "id": "proto.019-PtParisB.contract.balance_too_low"},
                    {"kind": "temporary", "id": "proto.019-PtParisB.tez.subtraction_underflow"}
                ]
            }),
        )),
    )
    .await;

    let outcome = service(&server)
        .transfer(keys.pkh(), &[transfer_item("1000000")], "0.001", &keys, None)
        .await;
    let payload = failure(outcome);
    assert_eq!(
        payload.error_id.as_deref(),
        Some("proto.019-PtParisB.contract.balance_too_low")
    );
    assert!(bodies(&server, INJECT_PATH).await.is_empty());
}

#[tokio::test]
async fn test_text_rejection_is_condensed() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_account(&server, &keys, true).await;
    mount_forger(&server, false).await;
    mount_post(
        &server,
        PREAPPLY_PATH,
        ResponseTemplate::new(400).set_body_string(
            "Failed to parse the request body: No case matched:\n  At /kind, unexpected string\n  At /contents/0/fee\n  Invalid fee\n",
        ),
    )
    .await;

    let outcome = service(&server)
        .transfer(keys.pkh(), &[transfer_item("1")], "0.001", &keys, None)
        .await;
    assert_eq!(failure(outcome).msg, "At /contents/0/fee Invalid fee");
}

#[tokio::test]
async fn test_injection_answer_must_be_an_operation_hash() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_account(&server, &keys, true).await;
    mount_forger(&server, false).await;
    mount_post(
        &server,
        PREAPPLY_PATH,
        ResponseTemplate::new(200).set_body_json(applied("transaction", json!({"status": "applied"}))),
    )
    .await;
    mount_post(&server, INJECT_PATH, ResponseTemplate::new(200).set_body_json(json!("oops"))).await;

    let outcome = service(&server)
        .transfer(keys.pkh(), &[transfer_item("1")], "0.001", &keys, None)
        .await;
    assert_eq!(failure(outcome).msg, "oops");
}

#[tokio::test]
async fn test_delegation() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_account(&server, &keys, true).await;
    mount_submission(&server, "delegation").await;
    let baker = b58c_encode(&[5u8; 20], Prefix::Ed25519PublicKeyHash);
    let limits = Limits {
        gas_limit: 1000,
        storage_limit: 0,
    };

    let outcome = service(&server)
        .delegate(keys.pkh(), &baker, "0.0015", &limits, &keys)
        .await;
    assert!(outcome.is_success());
    let preapplied = bodies(&server, PREAPPLY_PATH).await;
    let content = &preapplied[0][0]["contents"][0];
    assert_eq!(content["kind"], "delegation");
    assert_eq!(content["delegate"], baker.as_str());
    assert_eq!(content["fee"], "1500");
}

#[tokio::test]
async fn test_batch_origination_returns_new_contracts() {
    let server = MockServer::start().await;
    let keys = signer();
    let originated = b58c_encode(&[8u8; 20], Prefix::ContractHash);
    mount_account(&server, &keys, true).await;
    mount_forger(&server, false).await;
    mount_post(
        &server,
        PREAPPLY_PATH,
        ResponseTemplate::new(200).set_body_json(applied(
            "origination",
            json!({"status": "applied", "originated_contracts": [originated]}),
        )),
    )
    .await;
    mount_post(&server, INJECT_PATH, ResponseTemplate::new(200).set_body_json(json!(OP_HASH))).await;

    let code: Micheline = serde_json::from_value(json!([
        {"prim": "parameter", "args": [{"prim": "unit"}]},
        {"prim": "storage", "args": [{"prim": "unit"}]},
        {"prim": "code", "args": [[
            {"prim": "CDR"},
            {"prim": "NIL", "args": [{"prim": "operation"}]},
            {"prim": "PAIR"}
        ]]}
    ]))
    .unwrap();
    let item = BatchItem::Origination {
        balance: 0,
        delegate: None,
        script: Script {
            code,
            storage: Micheline::prim("Unit"),
        },
        limits: Limits {
            gas_limit: 1500,
            storage_limit: 400,
        },
    };

    let outcome = service(&server).operations(&[item], "0.002", &keys).await;
    assert_eq!(
        outcome.into_result().unwrap(),
        Submitted::Injected {
            op_hash: OP_HASH.to_string(),
            new_kt1s: vec![originated]
        }
    );
}

#[tokio::test]
async fn test_activation_injects_zero_signature() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_account(&server, &keys, true).await;
    mount_submission(&server, "activate_account").await;

    let outcome = service(&server)
        .activate(keys.pkh(), "41f98b15efc63fa893d61d7d6eee4a2ce9427ac4")
        .await;
    assert!(outcome.is_success());

    let preapplied = bodies(&server, PREAPPLY_PATH).await;
    assert_eq!(preapplied[0][0]["signature"], PLACEHOLDER_SIGNATURE);
    let injected = bodies(&server, INJECT_PATH).await;
    assert!(injected[0].as_str().unwrap().ends_with(&"0".repeat(128)));
}

fn signed_transaction(keys: &KeyPair) -> (ForgedOperation, tz_primitives::SignedBytes) {
    let op = ForgedOperation::new(
        branch(),
        vec![OperationContent::Transaction {
            manager: ManagerFields {
                source: keys.pkh().to_string(),
                fee: 1420,
                counter: 11,
                gas_limit: 10300,
                storage_limit: 0,
            },
            amount: 250_000,
            destination: recipient(),
            parameters: None,
        }],
    );
    let bytes = hex_to_bytes(&forge_hex(&op).unwrap()).unwrap();
    let signed = sign(
        &Watermark::GenericOperation.apply(&bytes),
        keys.secret_key().unwrap(),
    )
    .unwrap();
    (op, signed)
}

#[tokio::test]
async fn test_broadcast_presigned_bytes() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_submission(&server, "transaction").await;
    let (_, signed) = signed_transaction(&keys);

    let outcome = service(&server)
        .broadcast(&signed.signed_payload_hex, Some(PROTOCOL), true)
        .await;
    assert!(outcome.is_success());

    let preapplied = bodies(&server, PREAPPLY_PATH).await;
    assert_eq!(preapplied[0][0]["signature"], signed.encoded_signature.as_str());
    assert_eq!(preapplied[0][0]["protocol"], PROTOCOL);
    assert_eq!(preapplied[0][0]["contents"][0]["amount"], "250000");
    assert_eq!(bodies(&server, INJECT_PATH).await[0], json!(signed.signed_payload_hex));
}

#[tokio::test]
async fn test_broadcast_rejects_short_input() {
    let server = MockServer::start().await;
    let outcome = service(&server).broadcast(&"0".repeat(128), None, true).await;
    assert_eq!(failure(outcome).msg, "InvalidSignedBytes");
    assert!(server.received_requests().await.unwrap().is_empty());
}

async fn mount_included(server: &MockServer, keys: &KeyPair) -> String {
    let (op, signed) = signed_transaction(keys);
    mount_included_signed(server, &op, &signed.encoded_signature).await;
    signed.signed_payload_hex
}

async fn mount_included_signed(server: &MockServer, op: &ForgedOperation, signature: &str) {
    let mut included = serde_json::to_value(op).unwrap();
    included["protocol"] = json!(PROTOCOL);
    included["chain_id"] = json!(CHAIN_ID);
    included["hash"] = json!(OP_HASH);
    included["signature"] = json!(signature);
    included["contents"][0]["metadata"] = json!({"operation_result": {"status": "applied"}});

    mount_get(
        server,
        "/chains/main/blocks/100/operation_hashes",
        json!([[], [], [], ["onvBxZ8c7Yhk2AKcgbDbiDGUUcfeX5zPt2nYh4jKPUkqkzuDbpC", OP_HASH]]),
    )
    .await;
    mount_get(
        server,
        "/chains/main/blocks/100/operations",
        json!([[], [], [], [{"hash": "other"}, included]]),
    )
    .await;
    mount_forger(server, false).await;
}

#[tokio::test]
async fn test_verified_op_bytes() {
    let server = MockServer::start().await;
    let keys = signer();
    let expected = mount_included(&server, &keys).await;

    let bytes = service(&server)
        .get_verified_op_bytes(100, OP_HASH, keys.pkh(), &keys.pk_b58().unwrap())
        .await
        .unwrap();
    assert_eq!(bytes, expected);

    let forged = bodies(&server, FORGE_PATH).await;
    assert!(forged[0].get("signature").is_none());
    assert!(forged[0]["contents"][0].get("metadata").is_none());
}

#[tokio::test]
async fn test_verified_op_bytes_rejects_wrong_signer() {
    let server = MockServer::start().await;
    let keys = signer();
    mount_included(&server, &keys).await;
    let other = KeyPair::from_secret_key(SecretKey::from_ed25519_seed(&[8u8; 32]));
    let gateway = service(&server);

    let err = gateway
        .get_verified_op_bytes(100, OP_HASH, keys.pkh(), &other.pk_b58().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidPublicKey(_)));

    let err = gateway
        .get_verified_op_bytes(100, OP_HASH, other.pkh(), &other.pk_b58().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidSignature));

    let err = gateway
        .get_verified_op_bytes(100, "ooMissing", keys.pkh(), &keys.pk_b58().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::OperationNotFound { level: 100, .. }));
}

#[tokio::test]
async fn test_verified_op_bytes_requires_watermarked_signature() {
    let server = MockServer::start().await;
    let keys = signer();
    let (op, _) = signed_transaction(&keys);
    let bytes = hex_to_bytes(&forge_hex(&op).unwrap()).unwrap();
    let Some(SecretKey::Ed25519(sk)) = keys.secret_key() else {
        panic!("ed25519 signer expected");
    };
    let raw = sk.sign(&blake2b_256(&bytes)).to_bytes();
    let unwatermarked = b58c_encode(&raw, Prefix::Ed25519Signature);
    mount_included_signed(&server, &op, &unwatermarked).await;

    let err = service(&server)
        .get_verified_op_bytes(100, OP_HASH, keys.pkh(), &keys.pk_b58().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidSignature));
}

#[tokio::test]
async fn test_plain_result_queries_surface_rpc_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!([{"id": "proto.alpha.unknown"}])),
        )
        .mount(&server)
        .await;
    let wallet = service(&server);

    let err = wallet.get_constants().await.unwrap_err();
    assert!(matches!(err, WalletError::Rpc(tz_rpc::RpcError::Rejected { status: 400, .. })));
    let err = wallet.get_manager("tz1Ke2h7sDdakHJQh8WX4Z372du1KChsksyU").await.unwrap_err();
    assert!(matches!(err, WalletError::Rpc(_)));
}

#[tokio::test]
async fn test_queries() {
    let server = MockServer::start().await;
    let keys = signer();
    let contract = format!("/chains/main/blocks/head/context/contracts/{}", keys.pkh());
    mount_get(&server, &format!("{contract}/balance"), json!("4200000")).await;
    mount_get(&server, &format!("{contract}/manager_key"), Value::Null).await;
    mount_get(&server, &contract, json!({"balance": "4200000", "counter": "10"})).await;
    let wallet = service(&server);

    let balance = wallet.get_balance(keys.pkh()).await.into_result().unwrap();
    assert_eq!(balance.balance, "4200000");
    let delegate = wallet.get_delegate(keys.pkh()).await.into_result().unwrap();
    assert_eq!(delegate.delegate, "");
    let account = wallet.get_account(keys.pkh()).await.into_result().unwrap();
    assert_eq!(account.counter.as_deref(), Some("10"));
    assert!(!wallet.is_revealed(keys.pkh()).await);
    assert_eq!(wallet.get_manager(keys.pkh()).await.unwrap(), "");
}

#[tokio::test]
async fn test_is_revealed_when_lookup_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    assert!(service(&server).is_revealed("tz1Ke2h7sDdakHJQh8WX4Z372du1KChsksyU").await);
}

struct Directory {
    answer: PublicKeyPoint,
}

impl KeyLookupService for Directory {
    async fn lookup(&self, _point: &PublicKeyPoint) -> Result<KeyLookupAnswer, WalletError> {
        Ok(KeyLookupAnswer {
            public_key: self.answer.clone(),
            payload: json!({"verifier": "example"}),
        })
    }
}

#[tokio::test]
async fn test_lookup_key() {
    let server = MockServer::start().await;
    let owner = secp256k1_key_pair(&"01".repeat(32)).unwrap();
    let stranger = secp256k1_key_pair(&"02".repeat(32)).unwrap();
    let unrevealed = secp256k1_key_pair(&"03".repeat(32)).unwrap();
    let contracts = "/chains/main/blocks/head/context/contracts";
    mount_get(&server, &format!("{contracts}/{}/manager_key", owner.pkh()), json!(owner.pk_b58())).await;
    mount_get(&server, &format!("{contracts}/{}/manager_key", unrevealed.pkh()), Value::Null).await;
    let wallet = service(&server);

    let point = owner.public_key().unwrap().decompress().unwrap();
    let honest = Directory { answer: point.clone() };
    match wallet.lookup_key(owner.pkh(), &honest).await.unwrap() {
        Some(KeyLookup::Found(answer)) => assert_eq!(answer.public_key, point),
        other => panic!("expected Found, got {other:?}"),
    }

    let confused = Directory {
        answer: stranger.public_key().unwrap().decompress().unwrap(),
    };
    assert_eq!(wallet.lookup_key(owner.pkh(), &confused).await.unwrap(), None);
    assert_eq!(
        wallet.lookup_key(unrevealed.pkh(), &honest).await.unwrap(),
        Some(KeyLookup::NoReveal)
    );

    let err = wallet
        .lookup_key("tz1Ke2h7sDdakHJQh8WX4Z372du1KChsksyU", &honest)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "InvalidTorusAddress");
}
