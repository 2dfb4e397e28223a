//! Contract invocation templates.
//!
//! Manager-contract relays call the contract's `do` entrypoint with a
//! lambda that emits the wanted operation; token calls target the FA1.2
//! and FA2 `transfer`/`approve` entrypoints.

use serde::{Deserialize, Serialize};

use crate::content::{OperationContent, TransactionParameters};
use crate::micheline::Micheline;

fn relay(body: Vec<Micheline>) -> TransactionParameters {
    let mut value = vec![
        Micheline::prim("DROP"),
        Micheline::prim_args("NIL", vec![Micheline::prim("operation")]),
    ];
    value.extend(body);
    value.push(Micheline::prim("CONS"));
    TransactionParameters {
        entrypoint: "do".to_string(),
        value: Micheline::seq(value),
    }
}

fn push_mutez(amount_mutez: u64) -> Micheline {
    Micheline::prim_args("PUSH", vec![Micheline::prim("mutez"), Micheline::int(amount_mutez)])
}

/// Relay a transfer from a manager contract to an implicit account.
pub fn contract_pkh_transfer(to: &str, amount_mutez: u64) -> TransactionParameters {
    relay(vec![
        Micheline::prim_args("PUSH", vec![Micheline::prim("key_hash"), Micheline::string(to)]),
        Micheline::prim("IMPLICIT_ACCOUNT"),
        push_mutez(amount_mutez),
        Micheline::prim("UNIT"),
        Micheline::prim("TRANSFER_TOKENS"),
    ])
}

/// Relay a transfer from a manager contract to another contract.
///
/// The relay fails on chain if the destination has no `unit` entrypoint.
pub fn contract_kt_transfer(to: &str, amount_mutez: u64) -> TransactionParameters {
    let fail = Micheline::seq(vec![Micheline::seq(vec![
        Micheline::prim("UNIT"),
        Micheline::prim("FAILWITH"),
    ])]);
    relay(vec![
        Micheline::prim_args("PUSH", vec![Micheline::prim("address"), Micheline::string(to)]),
        Micheline::prim_args("CONTRACT", vec![Micheline::prim("unit")]),
        Micheline::seq(vec![Micheline::prim_args(
            "IF_NONE",
            vec![fail, Micheline::seq(vec![])],
        )]),
        push_mutez(amount_mutez),
        Micheline::prim("UNIT"),
        Micheline::prim("TRANSFER_TOKENS"),
    ])
}

/// Relay a delegate change from a manager contract.
pub fn contract_set_delegate(delegate: &str) -> TransactionParameters {
    relay(vec![
        Micheline::prim_args(
            "PUSH",
            vec![Micheline::prim("key_hash"), Micheline::string(delegate)],
        ),
        Micheline::prim("SOME"),
        Micheline::prim("SET_DELEGATE"),
    ])
}

/// Relay a delegate withdrawal from a manager contract.
pub fn contract_remove_delegate() -> TransactionParameters {
    relay(vec![
        Micheline::prim_args("NONE", vec![Micheline::prim("key_hash")]),
        Micheline::prim("SET_DELEGATE"),
    ])
}

/// FA1.2 `transfer(from, (to, amount))`.
pub fn fa12_transfer(from: &str, to: &str, amount: &str) -> TransactionParameters {
    TransactionParameters {
        entrypoint: "transfer".to_string(),
        value: Micheline::pair(
            Micheline::string(from),
            Micheline::pair(Micheline::string(to), Micheline::int(amount)),
        ),
    }
}

/// FA2 `transfer` with a single batch holding a single destination.
pub fn fa2_transfer(from: &str, to: &str, amount: &str, token_id: &str) -> TransactionParameters {
    let tx = Micheline::pair(
        Micheline::string(to),
        Micheline::pair(Micheline::int(token_id), Micheline::int(amount)),
    );
    TransactionParameters {
        entrypoint: "transfer".to_string(),
        value: Micheline::seq(vec![Micheline::pair(
            Micheline::string(from),
            Micheline::seq(vec![tx]),
        )]),
    }
}

/// FA1.2 `approve(spender, amount)`.
pub fn approve(spender: &str, amount: &str) -> TransactionParameters {
    TransactionParameters {
        entrypoint: "approve".to_string(),
        value: Micheline::pair(Micheline::string(spender), Micheline::int(amount)),
    }
}

/// FA1.2 allowance revocation (`approve` of zero).
pub fn revoke(spender: &str) -> TransactionParameters {
    approve(spender, "0")
}

/// A recognized token transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    /// `KT1…:token_id`.
    pub token_id: String,
    pub to: String,
    /// Amount in minor units.
    pub amount: String,
}

/// Recognize an FA1.2 or FA2 transfer built by `fa12_transfer` or
/// `fa2_transfer`.
///
/// Literals are collected in order; the parameters must equal the template
/// rebuilt from them. Anything else yields `None`.
pub fn parse_token_transfer(content: &OperationContent) -> Option<TokenTransfer> {
    let OperationContent::Transaction {
        destination,
        parameters: Some(params),
        ..
    } = content
    else {
        return None;
    };

    let mut strings = Vec::new();
    let mut ints = Vec::new();
    collect_literals(&params.value, &mut strings, &mut ints);

    match (strings.as_slice(), ints.as_slice()) {
        ([from, to], [amount]) if fa12_transfer(from, to, amount) == *params => {
            Some(TokenTransfer {
                token_id: format!("{destination}:0"),
                to: to.clone(),
                amount: amount.clone(),
            })
        }
        ([from, to], [id, amount]) if fa2_transfer(from, to, amount, id) == *params => {
            Some(TokenTransfer {
                token_id: format!("{destination}:{id}"),
                to: to.clone(),
                amount: amount.clone(),
            })
        }
        _ => None,
    }
}

fn collect_literals(value: &Micheline, strings: &mut Vec<String>, ints: &mut Vec<String>) {
    match value {
        Micheline::String { string } => strings.push(string.clone()),
        Micheline::Int { int } => ints.push(int.clone()),
        Micheline::Bytes { .. } => {}
        Micheline::Prim(p) => p.args.iter().for_each(|a| collect_literals(a, strings, ints)),
        Micheline::Seq(items) => items.iter().for_each(|a| collect_literals(a, strings, ints)),
    }
}
