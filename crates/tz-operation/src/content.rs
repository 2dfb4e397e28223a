//! Operation contents in the node's JSON schema.
//!
//! Each content is a variant of `OperationContent`, tagged by `kind`.
//! Manager operations share `ManagerFields`, flattened into the variant so
//! the JSON stays flat (`{"kind": "transaction", "source": …, "fee": …}`).

use serde::{Deserialize, Serialize};

use crate::micheline::Micheline;
use crate::serde_util::string_u64;

/// Gas limit of a prepended reveal.
pub const REVEAL_GAS_LIMIT: u64 = 200;
/// Storage limit of a prepended reveal.
pub const REVEAL_STORAGE_LIMIT: u64 = 0;

/// Fields common to every manager operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerFields {
    /// Implicit account paying fees and signing.
    pub source: String,
    /// Fee in mutez.
    #[serde(with = "string_u64")]
    pub fee: u64,
    /// Account counter of this content.
    #[serde(with = "string_u64")]
    pub counter: u64,
    #[serde(with = "string_u64")]
    pub gas_limit: u64,
    #[serde(with = "string_u64")]
    pub storage_limit: u64,
}

/// Contract invocation attached to a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionParameters {
    pub entrypoint: String,
    pub value: Micheline,
}

/// Code and initial storage of an origination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub code: Micheline,
    pub storage: Micheline,
}

/// A single operation content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationContent {
    /// Publishes the manager public key of an implicit account.
    Reveal {
        #[serde(flatten)]
        manager: ManagerFields,
        public_key: String,
    },
    /// Transfers tez and optionally calls a contract.
    Transaction {
        #[serde(flatten)]
        manager: ManagerFields,
        /// Amount in mutez.
        #[serde(with = "string_u64")]
        amount: u64,
        destination: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parameters: Option<TransactionParameters>,
    },
    /// Deploys a contract.
    Origination {
        #[serde(flatten)]
        manager: ManagerFields,
        /// Initial balance in mutez.
        #[serde(with = "string_u64")]
        balance: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delegate: Option<String>,
        script: Script,
    },
    /// Sets or withdraws the delegate of the source.
    Delegation {
        #[serde(flatten)]
        manager: ManagerFields,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delegate: Option<String>,
    },
    /// Claims a fundraiser allocation.
    ActivateAccount { pkh: String, secret: String },
}

impl OperationContent {
    /// The manager fields, if this is a manager operation.
    pub fn manager(&self) -> Option<&ManagerFields> {
        match self {
            OperationContent::Reveal { manager, .. }
            | OperationContent::Transaction { manager, .. }
            | OperationContent::Origination { manager, .. }
            | OperationContent::Delegation { manager, .. } => Some(manager),
            OperationContent::ActivateAccount { .. } => None,
        }
    }

    /// The `kind` tag as it appears in JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            OperationContent::Reveal { .. } => "reveal",
            OperationContent::Transaction { .. } => "transaction",
            OperationContent::Origination { .. } => "origination",
            OperationContent::Delegation { .. } => "delegation",
            OperationContent::ActivateAccount { .. } => "activate_account",
        }
    }

    /// A reveal with the fixed limits and zero fee.
    pub fn reveal(source: &str, counter: u64, public_key: &str) -> Self {
        OperationContent::Reveal {
            manager: ManagerFields {
                source: source.to_string(),
                fee: 0,
                counter,
                gas_limit: REVEAL_GAS_LIMIT,
                storage_limit: REVEAL_STORAGE_LIMIT,
            },
            public_key: public_key.to_string(),
        }
    }
}

/// An operation group: a branch and its contents, optionally signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgedOperation {
    /// Block hash the operation is anchored to.
    pub branch: String,
    pub contents: Vec<OperationContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl ForgedOperation {
    /// An unsigned operation group.
    pub fn new(branch: impl Into<String>, contents: Vec<OperationContent>) -> Self {
        ForgedOperation {
            branch: branch.into(),
            contents,
            protocol: None,
            signature: None,
        }
    }

    /// The group without `protocol` and `signature`, as sent to the forger.
    pub fn unsigned(&self) -> Self {
        ForgedOperation::new(self.branch.clone(), self.contents.clone())
    }
}
