//! Error types for node RPC operations.

use std::time::Duration;

use crate::types::NodeError;

/// Errors that can occur when talking to a node or reading its results.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The request could not complete, or the node answered 502/503/504.
    #[error("transport error from {endpoint}: {message}")]
    Transport {
        /// Node the failed attempt was sent to.
        endpoint: String,
        /// Description of the failure.
        message: String,
        /// Gateway status, if the node answered at all.
        status: Option<u16>,
    },

    /// The node explicitly rejected the request.
    #[error("node rejected the request ({status}): {body}")]
    Rejected {
        /// HTTP status of the rejection.
        status: u16,
        /// Response body, as JSON when it parses and as a JSON string otherwise.
        body: serde_json::Value,
    },

    /// Failed to serialize or deserialize data.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The node answered with a value of an unexpected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The injection call exceeded its time ceiling.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// No node endpoint is configured.
    #[error("no node endpoints configured")]
    NoEndpoints,

    /// The node accepted the operation but one of its contents failed.
    #[error("operation failed: {}", .0.id)]
    OperationFailed(NodeError),

    /// A content failed without any error object to explain it.
    #[error("Uncaught error in applied")]
    UncaughtApplied,
}

impl RpcError {
    /// Whether the failure is transport-class and may be retried.
    pub fn is_transport(&self) -> bool {
        matches!(self, RpcError::Transport { .. })
    }
}
