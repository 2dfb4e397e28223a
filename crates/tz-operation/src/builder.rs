//! Operation builder.
//!
//! Turns caller intents (transfers, a delegation, a raw batch) into a
//! `ForgedOperation`. Building is a pure fold over the input list: the
//! reveal (if the account has no manager key yet) takes the first counter,
//! every following content takes the next one, and only the last content
//! carries the fee.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::Address;
use crate::amount::{tez_to_mutez, to_minor_units};
use crate::content::{ForgedOperation, ManagerFields, OperationContent, Script, TransactionParameters};
use crate::script::{
    contract_kt_transfer, contract_pkh_transfer, contract_remove_delegate, contract_set_delegate,
    fa12_transfer, fa2_transfer,
};
use crate::serde_util::string_u64;
use crate::token::{Asset, TokenStandard};
use crate::OperationError;

/// On-chain state of the signing account, fetched before building.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountState {
    /// Block hash to anchor the operation to.
    pub branch: String,
    /// Current counter of the account.
    pub counter: u64,
    /// Whether the manager key is already revealed.
    pub revealed: bool,
    /// The signing implicit account.
    pub pkh: String,
    /// Public key to reveal, required when `revealed` is false.
    pub public_key: Option<String>,
}

/// One transfer requested by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferItem {
    pub destination: String,
    /// Decimal amount in display units (tez or token units).
    pub amount: String,
    #[serde(with = "string_u64")]
    pub gas_limit: u64,
    #[serde(with = "string_u64")]
    pub storage_limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<TransactionParameters>,
}

/// Gas and storage limits of a batch item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(with = "string_u64")]
    pub gas_limit: u64,
    #[serde(with = "string_u64")]
    pub storage_limit: u64,
}

/// A caller-supplied batch content.
///
/// Only protocol fields are read: `source`, `counter` and `fee` are
/// reassigned by the builder, and estimation fields such as
/// `gasRecommendation` are dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchItem {
    Transaction {
        #[serde(with = "string_u64")]
        amount: u64,
        destination: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parameters: Option<TransactionParameters>,
        #[serde(flatten)]
        limits: Limits,
    },
    Origination {
        #[serde(with = "string_u64")]
        balance: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delegate: Option<String>,
        script: Script,
        #[serde(flatten)]
        limits: Limits,
    },
    Delegation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delegate: Option<String>,
        #[serde(flatten)]
        limits: Limits,
    },
}

/// Convert a tez fee to mutez and enforce the hard cap.
///
/// # Arguments
/// * `fee` - Decimal fee in tez.
/// * `cap_tez` - Largest accepted fee in whole tez.
///
/// # Returns
/// The fee in mutez, or `FeeTooHigh` if it exceeds the cap.
pub fn check_fee(fee: &str, cap_tez: u64) -> Result<u64, OperationError> {
    let fee_mutez = tez_to_mutez(fee)?;
    let cap_mutez = cap_tez.saturating_mul(1_000_000);
    if fee_mutez > cap_mutez {
        return Err(OperationError::FeeTooHigh { fee_mutez, cap_mutez });
    }
    Ok(fee_mutez)
}

fn reveal_content(state: &AccountState) -> Result<Option<OperationContent>, OperationError> {
    if state.revealed {
        return Ok(None);
    }
    let public_key = state.public_key.as_deref().ok_or_else(|| {
        OperationError::UnsupportedOperation("reveal requires the public key".to_string())
    })?;
    Ok(Some(OperationContent::reveal(&state.pkh, state.counter + 1, public_key)))
}

/// Fold `items` into contents with sequential counters and a final fee.
///
/// `build` receives each item with its counter and fee.
fn assemble<T>(
    state: &AccountState,
    items: &[T],
    fee: u64,
    build: impl Fn(&T, u64, u64) -> Result<OperationContent, OperationError>,
) -> Result<ForgedOperation, OperationError> {
    if items.is_empty() {
        return Err(OperationError::UnsupportedOperation("no operations".to_string()));
    }
    let reveal = reveal_content(state)?;
    let first = state.counter + 1 + u64::from(reveal.is_some());
    let last = items.len() - 1;

    let contents = reveal
        .into_iter()
        .map(Ok)
        .chain(items.iter().enumerate().map(|(i, item)| {
            let item_fee = if i == last { fee } else { 0 };
            build(item, first + i as u64, item_fee)
        }))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        source = %state.pkh,
        contents = contents.len(),
        first_counter = state.counter + 1,
        "built operation"
    );
    Ok(ForgedOperation::new(state.branch.clone(), contents))
}

fn manager(source: &str, fee: u64, counter: u64, gas_limit: u64, storage_limit: u64) -> ManagerFields {
    ManagerFields {
        source: source.to_string(),
        fee,
        counter,
        gas_limit,
        storage_limit,
    }
}

/// Build a transfer of tez or of a token.
///
/// # Arguments
/// * `state` - Branch, counter and reveal status of the signing account.
/// * `from` - The account funds leave: the signer itself, or a manager
///   contract it controls.
/// * `transfers` - One content is emitted per item.
/// * `fee` - Total fee in mutez, charged on the last content.
/// * `token` - When set, each item is a token transfer of that asset.
///
/// # Returns
/// The unsigned operation, or `FractionalAmount` / `InvalidAddress` /
/// `UnsupportedOperation` for inputs that cannot be expressed.
pub fn build_transfer(
    state: &AccountState,
    from: &str,
    transfers: &[TransferItem],
    fee: u64,
    token: Option<&Asset>,
) -> Result<ForgedOperation, OperationError> {
    let from_address = Address::parse(from)?;
    assemble(state, transfers, fee, |item, counter, fee| {
        let fields = |source: &str| manager(source, fee, counter, item.gas_limit, item.storage_limit);

        if let Some(asset) = token {
            let amount = to_minor_units(&item.amount, asset.decimals)?.to_string();
            let invocation = match asset.standard {
                TokenStandard::Fa12 => fa12_transfer(&state.pkh, &item.destination, &amount),
                TokenStandard::Fa2 => {
                    fa2_transfer(&state.pkh, &item.destination, &amount, &asset.token_id)
                }
            };
            return Ok(OperationContent::Transaction {
                manager: fields(&state.pkh),
                amount: 0,
                destination: asset.contract_address.clone(),
                parameters: Some(invocation),
            });
        }

        let amount = tez_to_mutez(&item.amount)?;
        if from_address.is_implicit() {
            return Ok(OperationContent::Transaction {
                manager: fields(from),
                amount,
                destination: item.destination.clone(),
                parameters: item.parameters.clone(),
            });
        }

        if item.parameters.is_some() {
            return Err(OperationError::UnsupportedOperation(
                "Unsupported Operation".to_string(),
            ));
        }
        let relay = if Address::parse(&item.destination)?.is_implicit() {
            contract_pkh_transfer(&item.destination, amount)
        } else {
            contract_kt_transfer(&item.destination, amount)
        };
        Ok(OperationContent::Transaction {
            manager: fields(&state.pkh),
            amount: 0,
            destination: from.to_string(),
            parameters: Some(relay),
        })
    })
}

/// Build a delegation, or a delegate withdrawal when `delegate` is empty.
///
/// A manager-contract `from` is delegated through a relay call to the
/// contract itself.
pub fn build_delegation(
    state: &AccountState,
    from: &str,
    delegate: &str,
    fee: u64,
    limits: &Limits,
) -> Result<ForgedOperation, OperationError> {
    let from_address = Address::parse(from)?;
    let delegate = (!delegate.is_empty()).then(|| delegate.to_string());
    if let Some(baker) = &delegate {
        if !Address::parse(baker)?.is_implicit() {
            return Err(OperationError::InvalidAddress(baker.clone()));
        }
    }

    assemble(state, std::slice::from_ref(limits), fee, |limits, counter, fee| {
        if from_address.is_implicit() {
            return Ok(OperationContent::Delegation {
                manager: manager(from, fee, counter, limits.gas_limit, limits.storage_limit),
                delegate: delegate.clone(),
            });
        }
        let relay = match &delegate {
            Some(baker) => contract_set_delegate(baker),
            None => contract_remove_delegate(),
        };
        Ok(OperationContent::Transaction {
            manager: manager(&state.pkh, fee, counter, limits.gas_limit, limits.storage_limit),
            amount: 0,
            destination: from.to_string(),
            parameters: Some(relay),
        })
    })
}

/// Build a batch of caller-supplied contents signed by `state.pkh`.
pub fn build_batch(
    state: &AccountState,
    items: &[BatchItem],
    fee: u64,
) -> Result<ForgedOperation, OperationError> {
    assemble(state, items, fee, |item, counter, fee| {
        let fields = |limits: &Limits| {
            manager(&state.pkh, fee, counter, limits.gas_limit, limits.storage_limit)
        };
        Ok(match item {
            BatchItem::Transaction {
                amount,
                destination,
                parameters,
                limits,
            } => OperationContent::Transaction {
                manager: fields(limits),
                amount: *amount,
                destination: destination.clone(),
                parameters: parameters.clone(),
            },
            BatchItem::Origination {
                balance,
                delegate,
                script,
                limits,
            } => OperationContent::Origination {
                manager: fields(limits),
                balance: *balance,
                delegate: delegate.clone(),
                script: script.clone(),
            },
            BatchItem::Delegation { delegate, limits } => OperationContent::Delegation {
                manager: fields(limits),
                delegate: delegate.clone(),
            },
        })
    })
}

/// Build a fundraiser account activation.
///
/// # Arguments
/// * `branch` - Block hash to anchor to.
/// * `pkh` - The `tz1` account to activate.
/// * `secret` - The 20-byte activation secret as hex.
pub fn build_activation(
    branch: &str,
    pkh: &str,
    secret: &str,
) -> Result<ForgedOperation, OperationError> {
    match Address::parse(pkh)? {
        Address::Implicit {
            curve: tz_primitives::keys::Curve::Ed25519,
            ..
        } => {}
        _ => return Err(OperationError::InvalidAddress(pkh.to_string())),
    }
    let raw = tz_primitives::util::hex_to_bytes(secret)?;
    if raw.len() != 20 {
        return Err(OperationError::Forge(format!(
            "activation secret must be 20 bytes, got {}",
            raw.len()
        )));
    }
    Ok(ForgedOperation::new(
        branch,
        vec![OperationContent::ActivateAccount {
            pkh: pkh.to_string(),
            secret: secret.to_lowercase(),
        }],
    ))
}
