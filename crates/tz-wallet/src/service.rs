//! The operation service: every public wallet operation.
//!
//! A submit-type call runs one sequential pipeline:
//!
//! 1. fetch header, counter and manager key
//! 2. build the operation group locally
//! 3. forge it on the node and check the answer against the local forger
//! 4. sign the verified bytes, or simulate when no secret key is held
//! 5. preapply, classify, inject
//!
//! Every step can end the call; its error is folded into an [`Outcome`].
//!
//! Only submissions and the account queries answer with [`Outcome`].
//! `get_manager`, `get_constants`, `get_verified_op_bytes` and `lookup_key`
//! return a plain `Result` for callers that branch on the error.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};
use tz_operation::builder::{build_activation, build_batch, build_delegation, build_transfer, check_fee};
use tz_operation::forge::{parse_hex, verify_forge};
use tz_operation::{
    AccountState, AssetResolver, BatchItem, ForgedOperation, Limits, StaticAssets, TransferItem,
};
use tz_primitives::keys::public_key::{decompress, pk_to_pkh};
use tz_primitives::signer::{decode_signature, sig_to_prefixed_sig, sign, verify, SIGNATURE_LEN};
use tz_primitives::util::{bytes_to_hex, hex_to_bytes};
use tz_primitives::{KeyPair, Watermark};
use tz_rpc::classifier::{check_applied, originated_contracts, AppliedSource};
use tz_rpc::node::MANAGER_PASS;
use tz_rpc::{BlockHeader, RpcGateway};

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::key_lookup::{KeyLookup, KeyLookupService};
use crate::outcome::{failure_payload, ErrorRenderer, Outcome, PlainRenderer};
use crate::types::{AccountInfo, BalanceInfo, DelegateInfo, Submitted};

/// Signature attached to operations that are simulated or carry no real
/// signature. The node accepts it for dry runs.
pub const PLACEHOLDER_SIGNATURE: &str = "edsigtXomBKi5CTRf5cjATJWSyaRvhfYNHqSUGrn4SdbYRcGwQrUGjzEfQDTuqHhuA8b2d8NarZjz8TRf65WkpQmo423BtomS8Q";

/// Length of an operation hash returned by a successful injection.
pub const OP_HASH_LEN: usize = 51;

const SIGNATURE_HEX_LEN: usize = SIGNATURE_LEN * 2;

/// Wallet operations against a set of Tezos nodes.
///
/// The service holds no per-account state; concurrent calls are
/// independent. Two concurrent submissions for the same account race on
/// its counter.
#[derive(Clone)]
pub struct OperationService {
    gateway: RpcGateway,
    config: WalletConfig,
    assets: Arc<dyn AssetResolver>,
    renderer: Arc<dyn ErrorRenderer>,
}

impl OperationService {
    /// A service with no known tokens and plain error messages.
    pub fn new(gateway: RpcGateway, config: WalletConfig) -> Self {
        OperationService {
            gateway,
            config,
            assets: Arc::new(StaticAssets::new()),
            renderer: Arc::new(PlainRenderer),
        }
    }

    /// Replace the token table.
    pub fn with_assets(mut self, assets: Arc<dyn AssetResolver>) -> Self {
        self.assets = assets;
        self
    }

    /// Replace the error message renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn ErrorRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn gateway(&self) -> &RpcGateway {
        &self.gateway
    }

    fn outcome<T>(&self, operation: &'static str, result: Result<T, WalletError>) -> Outcome<T> {
        match result {
            Ok(payload) => Outcome::Success(payload),
            Err(err) => {
                warn!(operation, code = err.code(), error = %err, "wallet operation failed");
                Outcome::Failure(failure_payload(&err, self.renderer.as_ref()))
            }
        }
    }

    // -----------------------------------------------------------------
    // Submit-type operations
    // -----------------------------------------------------------------

    /// Transfer tez, or a token when `token` names a known ticker.
    ///
    /// # Arguments
    /// * `from` - The signer's own address, or a manager contract it controls.
    /// * `transfers` - One content per item; amounts in display units.
    /// * `fee` - Total fee in tez.
    /// * `keys` - Signing keys; without a secret key the call only simulates.
    /// * `token` - Ticker of the token to transfer.
    pub async fn transfer(
        &self,
        from: &str,
        transfers: &[TransferItem],
        fee: &str,
        keys: &KeyPair,
        token: Option<&str>,
    ) -> Outcome<Submitted> {
        let result = self.try_transfer(from, transfers, fee, keys, token).await;
        self.outcome("transfer", result)
    }

    async fn try_transfer(
        &self,
        from: &str,
        transfers: &[TransferItem],
        fee: &str,
        keys: &KeyPair,
        token: Option<&str>,
    ) -> Result<Submitted, WalletError> {
        let fee = check_fee(fee, self.config.fee_hard_cap_tez)?;
        let asset = token
            .map(|ticker| {
                self.assets
                    .resolve_asset(ticker)
                    .ok_or_else(|| WalletError::UnknownAsset(ticker.to_string()))
            })
            .transpose()?;

        let (state, header) = self.account_state(keys).await?;
        let op = build_transfer(&state, from, transfers, fee, asset.as_ref())?;
        self.submit(op, &header, keys).await
    }

    /// Set the delegate of `from`, or withdraw it when `delegate` is empty.
    pub async fn delegate(
        &self,
        from: &str,
        delegate: &str,
        fee: &str,
        limits: &Limits,
        keys: &KeyPair,
    ) -> Outcome<Submitted> {
        let result = self.try_delegate(from, delegate, fee, limits, keys).await;
        self.outcome("delegate", result)
    }

    async fn try_delegate(
        &self,
        from: &str,
        delegate: &str,
        fee: &str,
        limits: &Limits,
        keys: &KeyPair,
    ) -> Result<Submitted, WalletError> {
        let fee = check_fee(fee, self.config.fee_hard_cap_tez)?;
        let (state, header) = self.account_state(keys).await?;
        let op = build_delegation(&state, from, delegate, fee, limits)?;
        self.submit(op, &header, keys).await
    }

    /// Submit caller-supplied contents as one operation group.
    ///
    /// Originated contract addresses are returned in `newKT1s`.
    pub async fn operations(&self, items: &[BatchItem], fee: &str, keys: &KeyPair) -> Outcome<Submitted> {
        let result = self.try_operations(items, fee, keys).await;
        self.outcome("operations", result)
    }

    async fn try_operations(
        &self,
        items: &[BatchItem],
        fee: &str,
        keys: &KeyPair,
    ) -> Result<Submitted, WalletError> {
        let fee = check_fee(fee, self.config.fee_hard_cap_tez)?;
        let (state, header) = self.account_state(keys).await?;
        let op = build_batch(&state, items, fee)?;
        self.submit(op, &header, keys).await
    }

    /// Activate a fundraiser account.
    ///
    /// Activation needs no signature: the verified bytes are injected with
    /// an all-zero signature, and preapply sees the placeholder.
    pub async fn activate(&self, pkh: &str, secret: &str) -> Outcome<Submitted> {
        let result = self.try_activate(pkh, secret).await;
        self.outcome("activate", result)
    }

    async fn try_activate(&self, pkh: &str, secret: &str) -> Result<Submitted, WalletError> {
        let header = self.gateway.header().await?;
        let mut op = build_activation(&header.hash, pkh, secret)?;
        let opbytes = self.forge_verified(&op).await?;

        op.protocol = Some(header.protocol);
        op.signature = Some(PLACEHOLDER_SIGNATURE.to_string());
        let signed_hex = format!("{opbytes}{}", "0".repeat(SIGNATURE_HEX_LEN));
        self.preapply_and_inject(&op, &signed_hex).await
    }

    /// Preapply and inject bytes signed elsewhere.
    ///
    /// # Arguments
    /// * `sopbytes` - Forged bytes followed by the 64-byte signature, as hex.
    /// * `protocol` - Protocol to preapply under; the current one when `None`.
    /// * `is_edsig` - Whether the signature is Ed25519 (`edsig`) or
    ///   secp256k1 (`spsig1`).
    pub async fn broadcast(
        &self,
        sopbytes: &str,
        protocol: Option<&str>,
        is_edsig: bool,
    ) -> Outcome<Submitted> {
        let result = self.try_broadcast(sopbytes, protocol, is_edsig).await;
        self.outcome("broadcast", result)
    }

    async fn try_broadcast(
        &self,
        sopbytes: &str,
        protocol: Option<&str>,
        is_edsig: bool,
    ) -> Result<Submitted, WalletError> {
        if !sopbytes.is_ascii() || sopbytes.len() <= SIGNATURE_HEX_LEN {
            return Err(WalletError::InvalidSignedBytes(format!(
                "expected more than {SIGNATURE_HEX_LEN} hex characters"
            )));
        }
        let (forged, signature_hex) = sopbytes.split_at(sopbytes.len() - SIGNATURE_HEX_LEN);
        let mut op = parse_hex(forged)?;
        op.signature = Some(sig_to_prefixed_sig(signature_hex, is_edsig)?);
        op.protocol = Some(match protocol {
            Some(protocol) => protocol.to_string(),
            None => self.gateway.header().await?.protocol,
        });
        self.preapply_and_inject(&op, sopbytes).await
    }

    // -----------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------

    async fn account_state(&self, keys: &KeyPair) -> Result<(AccountState, BlockHeader), WalletError> {
        let pkh = keys.pkh();
        let header = self.gateway.header().await?;
        let counter = self.gateway.counter(pkh).await?;
        let manager_key = self.gateway.manager_key(pkh).await?;
        debug!(pkh, counter, revealed = manager_key.is_some(), "fetched account state");

        let state = AccountState {
            branch: header.hash.clone(),
            counter,
            revealed: manager_key.is_some(),
            pkh: pkh.to_string(),
            public_key: keys.pk_b58(),
        };
        Ok((state, header))
    }

    /// Forge on the node and accept the bytes only if they match the
    /// local encoding.
    async fn forge_verified(&self, op: &ForgedOperation) -> Result<String, WalletError> {
        let remote = self.gateway.forge_operation(&op.unsigned()).await?;
        verify_forge(&remote, op)?;
        Ok(remote.to_lowercase())
    }

    async fn submit(
        &self,
        mut op: ForgedOperation,
        header: &BlockHeader,
        keys: &KeyPair,
    ) -> Result<Submitted, WalletError> {
        let opbytes = self.forge_verified(&op).await?;

        let Some(sk) = keys.secret_key() else {
            op.signature = Some(PLACEHOLDER_SIGNATURE.to_string());
            let applied = self.gateway.simulate_operation(&op, &header.chain_id).await?;
            check_applied(std::slice::from_ref(&applied), AppliedSource::Simulation)?;
            info!(pkh = keys.pkh(), "operation simulated, returning unsigned bytes");
            return Ok(Submitted::Unsigned {
                unsigned_operation: opbytes,
            });
        };

        let watermarked = Watermark::GenericOperation.apply(&hex_to_bytes(&opbytes)?);
        let signed = sign(&watermarked, sk)?;
        op.protocol = Some(header.protocol.clone());
        op.signature = Some(signed.encoded_signature);
        self.preapply_and_inject(&op, &signed.signed_payload_hex).await
    }

    async fn preapply_and_inject(
        &self,
        op: &ForgedOperation,
        signed_hex: &str,
    ) -> Result<Submitted, WalletError> {
        let applied = self.gateway.preapply_operation(op).await?;
        check_applied(&applied, AppliedSource::Preapply)?;
        let new_kt1s = originated_contracts(&applied);

        let answer = self.gateway.inject_operation(signed_hex).await?;
        match answer.as_str() {
            Some(op_hash) if op_hash.len() == OP_HASH_LEN => Ok(Submitted::Injected {
                op_hash: op_hash.to_string(),
                new_kt1s,
            }),
            Some(other) => Err(WalletError::InjectionFailed(other.to_string())),
            None => Err(WalletError::InjectionFailed(answer.to_string())),
        }
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    pub async fn get_balance(&self, pkh: &str) -> Outcome<BalanceInfo> {
        let result = self.gateway.balance(pkh).await;
        self.outcome(
            "get_balance",
            result.map(|balance| BalanceInfo { balance }).map_err(Into::into),
        )
    }

    /// Current delegate, empty when none is set.
    pub async fn get_delegate(&self, pkh: &str) -> Outcome<DelegateInfo> {
        let result = self.gateway.contract(pkh).await;
        self.outcome(
            "get_delegate",
            result
                .map(|info| DelegateInfo {
                    delegate: info.delegate.unwrap_or_default(),
                })
                .map_err(Into::into),
        )
    }

    pub async fn get_account(&self, pkh: &str) -> Outcome<AccountInfo> {
        let result = self.gateway.contract(pkh).await;
        self.outcome(
            "get_account",
            result
                .map(|info| AccountInfo {
                    balance: info.balance,
                    manager: info.manager,
                    delegate: info.delegate.unwrap_or_default(),
                    counter: info.counter,
                })
                .map_err(Into::into),
        )
    }

    pub async fn get_voting_rights(&self) -> Outcome<Value> {
        let result = self.gateway.voting_listings().await;
        self.outcome("get_voting_rights", result.map_err(Into::into))
    }

    /// Whether the account's manager key is revealed.
    ///
    /// A failed lookup counts as revealed, so callers never prepend a
    /// reveal on a guess.
    pub async fn is_revealed(&self, pkh: &str) -> bool {
        match self.gateway.manager_key(pkh).await {
            Ok(key) => key.is_some(),
            Err(err) => {
                warn!(pkh, error = %err, "manager key lookup failed, assuming revealed");
                true
            }
        }
    }

    /// Revealed manager key, empty when unrevealed.
    pub async fn get_manager(&self, pkh: &str) -> Result<String, WalletError> {
        Ok(self.gateway.manager_key(pkh).await?.unwrap_or_default())
    }

    pub async fn get_constants(&self) -> Result<Value, WalletError> {
        Ok(self.gateway.constants().await?)
    }

    /// Re-forge an included operation and check its signer.
    ///
    /// # Arguments
    /// * `level` - Level of the block holding the operation.
    /// * `op_hash` - Hash of the operation.
    /// * `pkh` - Expected signer address.
    /// * `pk` - Public key of the signer (`edpk`).
    ///
    /// # Returns
    /// The forged bytes followed by the raw signature as hex, or
    /// `InvalidPublicKey` / `InvalidSignature` when the signer does not
    /// match.
    ///
    /// The signature is checked over the watermarked payload
    /// (`0x03` followed by the forged bytes), the same message the signer
    /// hashes. Signatures produced over the raw forged bytes without the
    /// watermark will not verify.
    pub async fn get_verified_op_bytes(
        &self,
        level: u64,
        op_hash: &str,
        pkh: &str,
        pk: &str,
    ) -> Result<String, WalletError> {
        let not_found = || WalletError::OperationNotFound {
            level,
            hash: op_hash.to_string(),
        };
        let hashes = self.gateway.operation_hashes(level).await?;
        let index = hashes
            .get(MANAGER_PASS)
            .and_then(|pass| pass.iter().position(|h| h == op_hash))
            .ok_or_else(not_found)?;
        let operations = self.gateway.block_operations(level).await?;
        let mut op = operations
            .get(MANAGER_PASS)
            .and_then(|pass| pass.get(index))
            .cloned()
            .ok_or_else(not_found)?;

        let signature = op
            .get("signature")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(WalletError::InvalidSignature)?;
        strip_included_operation(&mut op);
        let forged = self.gateway.forge_operation(&op).await?;

        if pk_to_pkh(pk)? != pkh {
            return Err(WalletError::InvalidPublicKey(pk.to_string()));
        }
        let bytes = hex_to_bytes(&forged)?;
        if !verify(&Watermark::GenericOperation.apply(&bytes), &signature, pk) {
            return Err(WalletError::InvalidSignature);
        }
        Ok(format!("{}{}", forged, bytes_to_hex(&decode_signature(&signature)?)))
    }

    /// Ask `service` about the revealed key of a `tz2` account.
    ///
    /// # Returns
    /// `NoReveal` for an unrevealed account, `Found` when the service
    /// answers for the same point, and `None` when its answer is about a
    /// different key.
    pub async fn lookup_key<L: KeyLookupService>(
        &self,
        address: &str,
        service: &L,
    ) -> Result<Option<KeyLookup>, WalletError> {
        if address.len() != 36 || !address.starts_with("tz2") {
            return Err(WalletError::InvalidTorusAddress(address.to_string()));
        }
        let Some(manager_key) = self.gateway.manager_key(address).await? else {
            return Ok(Some(KeyLookup::NoReveal));
        };
        let point = decompress(&manager_key)?;
        let answer = service.lookup(&point).await?;
        if answer.public_key != point {
            warn!(address, "key lookup answered for a different key");
            return Ok(None);
        }
        Ok(Some(KeyLookup::Found(answer)))
    }
}

/// Reduce an included operation to what the forger accepts.
fn strip_included_operation(op: &mut Value) {
    if let Some(fields) = op.as_object_mut() {
        for key in ["chain_id", "signature", "hash", "protocol"] {
            fields.remove(key);
        }
    }
    let Some(contents) = op.get_mut("contents").and_then(Value::as_array_mut) else {
        return;
    };
    for content in contents.iter_mut().filter_map(Value::as_object_mut) {
        content.remove("metadata");
        if let Some(key) = content.remove("managerPubkey") {
            content.insert("manager_pubkey".to_string(), key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_included_operation() {
        let mut op = json!({
            "protocol": "PtParisBxoLz5gzMmn3d9WBQNoPSZakgnkMC2VNuQ3KXfUtUQeZ",
            "chain_id": "NetXdQprcVkpaWU",
            "hash": "oo…",
            "branch": "BL…",
            "signature": "sig…",
            "contents": [
                {"kind": "origination", "managerPubkey": "tz1…", "metadata": {"balance_updates": []}},
                {"kind": "transaction", "metadata": {}}
            ]
        });
        strip_included_operation(&mut op);
        assert_eq!(
            op,
            json!({
                "branch": "BL…",
                "contents": [
                    {"kind": "origination", "manager_pubkey": "tz1…"},
                    {"kind": "transaction"}
                ]
            })
        );
    }

    #[test]
    fn test_placeholder_signature_decodes() {
        assert!(decode_signature(PLACEHOLDER_SIGNATURE).is_ok());
    }
}
