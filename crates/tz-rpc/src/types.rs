//! Node RPC data types: configuration, block header, contract info and
//! applied-operation results.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration for an [`RpcGateway`](crate::RpcGateway).
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Node base URLs, tried round-robin.
    pub endpoints: Vec<String>,
    /// Wait between two attempts after a transport failure.
    pub retry_delay: Duration,
    /// Lower bound of the total attempt count; the bound is
    /// `max(min_attempts, endpoints.len())`.
    pub min_attempts: usize,
    /// Ceiling on the injection call.
    pub injection_timeout: Duration,
    /// Block the header is read from; lagging head keeps the branch valid
    /// across short reorganizations.
    pub header_block: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["https://mainnet.api.tez.ie".to_string()],
            retry_delay: Duration::from_millis(250),
            min_attempts: 3,
            injection_timeout: Duration::from_secs(30),
            header_block: "head~3".to_string(),
        }
    }
}

/// Block header fields used to anchor and submit operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block hash, used as the operation branch.
    pub hash: String,
    /// Chain identifier (`Net…`).
    pub chain_id: String,
    /// Protocol hash attached to preapplied operations.
    pub protocol: String,
    /// Block level.
    pub level: u64,
}

/// Contract state as returned by the contract info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    /// Balance in mutez.
    pub balance: String,
    /// Current delegate, if any.
    #[serde(default)]
    pub delegate: Option<String>,
    /// Counter of an implicit account.
    #[serde(default)]
    pub counter: Option<String>,
    /// Manager of a legacy originated account.
    #[serde(default)]
    pub manager: Option<String>,
}

/// One error object reported by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeError {
    /// Namespaced identifier such as `proto.019-PtParisB.contract.balance_too_low`.
    #[serde(default)]
    pub id: String,
    /// Error kind (`temporary`, `permanent`, `branch`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Value a contract failed with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<Value>,
    /// Script location of the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    /// Message of a generic `failure` error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Every other field of the error object.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of applying one content or one internal operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    /// `applied`, `failed`, `backtracked` or `skipped`.
    pub status: String,
    /// Errors, in the order the node reports them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<NodeError>,
    /// Contracts created by an origination.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub originated_contracts: Vec<String>,
}

/// An operation emitted by a contract while applying a content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalOperationResult {
    /// Kind of the internal operation.
    #[serde(default)]
    pub kind: Option<String>,
    /// Its application result.
    #[serde(default)]
    pub result: Option<OperationResult>,
}

/// Node metadata attached to an applied content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentMetadata {
    /// Result of the content itself; absent for non-manager contents.
    #[serde(default)]
    pub operation_result: Option<OperationResult>,
    /// Results of operations the content emitted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_operation_results: Vec<InternalOperationResult>,
}

/// One content of an applied operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedContent {
    /// Content kind (`transaction`, `origination`, …).
    pub kind: String,
    /// Node metadata.
    #[serde(default)]
    pub metadata: Option<ContentMetadata>,
}

/// A simulated or preapplied operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedOperation {
    /// Applied contents, in operation order.
    #[serde(default)]
    pub contents: Vec<AppliedContent>,
}
