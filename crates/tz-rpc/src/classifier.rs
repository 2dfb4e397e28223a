//! Classification of simulated and preapplied operation results.
//!
//! A content whose result status is not `applied` fails the operation. The
//! reported cause is picked from the content's errors by a small policy
//! table: a specific cause reported just before a generic one supersedes it.

use tracing::warn;

use crate::error::RpcError;
use crate::types::{AppliedOperation, NodeError};

/// Where an applied result came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppliedSource {
    /// Dry run of an unsigned operation.
    Simulation,
    /// Preapply of a signed operation.
    Preapply,
}

impl AppliedSource {
    fn label(self) -> &'static str {
        match self {
            AppliedSource::Simulation => "sim",
            AppliedSource::Preapply => "pre",
        }
    }
}

/// Error causes the classifier distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCause {
    /// The source cannot pay the amount and fees.
    BalanceTooLow,
    /// Generic tez arithmetic underflow.
    SubtractionUnderflow,
    /// Any other error.
    Other,
}

/// Identifier suffix of each recognized cause. Identifiers are namespaced
/// by protocol, so only the suffix is stable.
const CAUSES: [(&str, ErrorCause); 2] = [
    (".balance_too_low", ErrorCause::BalanceTooLow),
    (".tez.subtraction_underflow", ErrorCause::SubtractionUnderflow),
];

impl ErrorCause {
    /// Classify a node error identifier.
    pub fn of(id: &str) -> Self {
        CAUSES
            .iter()
            .find(|(suffix, _)| id.ends_with(suffix))
            .map(|(_, cause)| *cause)
            .unwrap_or(ErrorCause::Other)
    }

    /// Whether `self`, reported just before `generic`, is the more
    /// actionable cause.
    fn supersedes(self, generic: ErrorCause) -> bool {
        matches!(
            (self, generic),
            (ErrorCause::BalanceTooLow, ErrorCause::SubtractionUnderflow)
        )
    }
}

impl NodeError {
    /// The cause this error denotes.
    pub fn cause(&self) -> ErrorCause {
        ErrorCause::of(&self.id)
    }
}

/// Pick the error to report from a content's ordered error list.
///
/// The last error is primary unless the one before it supersedes it.
pub fn primary_error(errors: &[NodeError]) -> Option<&NodeError> {
    match errors {
        [.., secondary, last] if secondary.cause().supersedes(last.cause()) => Some(secondary),
        [.., last] => Some(last),
        [] => None,
    }
}

/// Check that every content of the first applied operation was applied.
///
/// # Returns
/// `Ok(())`, `OperationFailed` with the selected cause, or `UncaughtApplied`
/// when a content failed without any error object. Top-level errors take
/// precedence over failing internal operations.
pub fn check_applied(applied: &[AppliedOperation], source: AppliedSource) -> Result<(), RpcError> {
    let Some(operation) = applied.first() else {
        return Err(RpcError::InvalidResponse("empty applied result".to_string()));
    };

    let mut failed = false;
    for content in &operation.contents {
        let Some(metadata) = &content.metadata else {
            continue;
        };
        let Some(result) = &metadata.operation_result else {
            continue;
        };
        if result.status == "applied" {
            continue;
        }
        failed = true;

        let cause = primary_error(&result.errors).or_else(|| {
            metadata
                .internal_operation_results
                .iter()
                .filter_map(|ior| ior.result.as_ref())
                .find(|r| r.status == "failed")
                .and_then(|r| r.errors.last())
        });
        if let Some(err) = cause {
            warn!(
                source = source.label(),
                kind = %content.kind,
                status = %result.status,
                error_id = %err.id,
                "applied operation failed"
            );
            return Err(RpcError::OperationFailed(err.clone()));
        }
    }

    if failed {
        warn!(source = source.label(), "applied operation failed without an error");
        return Err(RpcError::UncaughtApplied);
    }
    Ok(())
}

/// Contracts created by the originations of the first applied operation.
pub fn originated_contracts(applied: &[AppliedOperation]) -> Vec<String> {
    applied
        .first()
        .into_iter()
        .flat_map(|op| &op.contents)
        .filter(|c| c.kind == "origination")
        .filter_map(|c| c.metadata.as_ref()?.operation_result.as_ref())
        .flat_map(|r| r.originated_contracts.iter().cloned())
        .collect()
}
