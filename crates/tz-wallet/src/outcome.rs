//! Uniform result shape of every public wallet operation.
//!
//! Failures are never raised to the caller. They are folded into
//! `{"success": false, "payload": {"errorId"?, "msg"}}`, with the message
//! produced by an [`ErrorRenderer`] from the most specific cause available.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tz_operation::OperationError;
use tz_rpc::{NodeError, RpcError};

use crate::error::WalletError;

/// Message used when an error carries nothing to render.
pub const UNRECOGNIZED_ERROR: &str = "Unrecognized error";

/// Payload of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailurePayload {
    /// Node error identifier, when the failure came from the node.
    #[serde(rename = "errorId", skip_serializing_if = "Option::is_none")]
    pub error_id: Option<String>,
    /// User-facing message.
    pub msg: String,
}

/// Result of a public wallet operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(FailurePayload),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The success payload, if any.
    pub fn payload(&self) -> Option<&T> {
        match self {
            Outcome::Success(payload) => Some(payload),
            Outcome::Failure(_) => None,
        }
    }

    /// The failure payload, if any.
    pub fn failure(&self) -> Option<&FailurePayload> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<T, FailurePayload> {
        match self {
            Outcome::Success(payload) => Ok(payload),
            Outcome::Failure(failure) => Err(failure),
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Outcome::Success(payload) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("payload", payload)?;
            }
            Outcome::Failure(failure) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("payload", failure)?;
            }
        }
        state.end()
    }
}

/// Turns an error key into a user-facing message.
///
/// Keys are node error identifiers, taxonomy codes such as `TooHighFee`,
/// or free text. `with` and `location` are passed through from node errors
/// raised by a contract.
pub trait ErrorRenderer: Send + Sync {
    fn render(&self, key: &str, with: Option<&Value>, location: Option<&Value>) -> String;
}

/// Renders the key itself, followed by the contract's failure value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl ErrorRenderer for PlainRenderer {
    fn render(&self, key: &str, with: Option<&Value>, location: Option<&Value>) -> String {
        match (with, location) {
            (Some(with), Some(location)) => format!("{key}: {with} (at {location})"),
            (Some(with), None) => format!("{key}: {with}"),
            _ => key.to_string(),
        }
    }
}

/// Fold an error into the failure payload.
pub fn failure_payload(err: &WalletError, renderer: &dyn ErrorRenderer) -> FailurePayload {
    let local = |key: &str| FailurePayload {
        error_id: None,
        msg: renderer.render(key, None, None),
    };
    match err {
        WalletError::Rpc(RpcError::Rejected { body, .. }) => from_node_body(body, renderer),
        WalletError::Rpc(RpcError::OperationFailed(node_error)) => {
            from_node_error(node_error, renderer)
        }
        WalletError::Rpc(RpcError::Transport { message, .. }) => local(message),
        WalletError::Rpc(RpcError::UncaughtApplied) => local("Uncaught error in applied"),
        WalletError::Operation(op @ OperationError::FractionalAmount { .. }) => {
            local(&op.to_string())
        }
        WalletError::Operation(OperationError::UnsupportedOperation(reason)) => local(reason),
        WalletError::InjectionFailed(answer) => FailurePayload {
            error_id: None,
            msg: answer.clone(),
        },
        other => local(other.code()),
    }
}

/// Failure payload of a rejected request body.
///
/// Plain-text bodies are validation traces; JSON bodies are error lists
/// whose first entry is reported.
pub fn from_node_body(body: &Value, renderer: &dyn ErrorRenderer) -> FailurePayload {
    match body {
        Value::String(text) => FailurePayload {
            error_id: None,
            msg: renderer.render(&pair_trace_lines(text), None, None),
        },
        Value::Array(items) if !items.is_empty() => from_error_value(&items[0], renderer),
        other => from_error_value(other, renderer),
    }
}

fn from_node_error(err: &NodeError, renderer: &dyn ErrorRenderer) -> FailurePayload {
    match serde_json::to_value(err) {
        Ok(value) => from_error_value(&value, renderer),
        Err(_) => FailurePayload {
            error_id: Some(err.id.clone()),
            msg: renderer.render(&err.id, None, None),
        },
    }
}

fn from_error_value(value: &Value, renderer: &dyn ErrorRenderer) -> FailurePayload {
    let text = |key: &str| value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
    let field = |key: &str| value.get(key).filter(|v| !v.is_null());
    let error_id = text("id").map(str::to_string);

    let msg = if let Some(message) = text("message") {
        renderer.render(message, None, None)
    } else if let Some(id) = &error_id {
        match (field("with"), text("msg")) {
            (Some(with), _) => renderer.render(id, Some(with), field("location")),
            (None, Some(msg)) if id == "failure" => renderer.render(msg, None, None),
            _ => renderer.render(id, None, None),
        }
    } else if let Some(status_text) = text("statusText") {
        status_text.to_string()
    } else if let Some(s) = value.as_str() {
        renderer.render(s, None, None)
    } else {
        UNRECOGNIZED_ERROR.to_string()
    };
    FailurePayload { error_id, msg }
}

/// Condense a multi-line validation trace.
///
/// The last `At /…` path line (other than `At /kind`) is joined with the
/// line after it; without one the text is returned unchanged.
pub fn pair_trace_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').map(str::trim).collect();
    let mut out = text.to_string();
    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("At /") && !line.starts_with("At /kind") {
            if let Some(next) = lines.get(i + 1).filter(|l| !l.is_empty()) {
                out = format!("{line} {next}");
            }
        }
    }
    out
}
