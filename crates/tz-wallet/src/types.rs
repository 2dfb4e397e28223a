//! Payload types returned by wallet operations.

use serde::{Deserialize, Serialize};

/// Result of a submit-type operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Submitted {
    /// Signed, preapplied and injected.
    Injected {
        /// The 51-character operation hash.
        #[serde(rename = "opHash")]
        op_hash: String,
        /// Contracts originated by the operation.
        #[serde(rename = "newKT1s", default)]
        new_kt1s: Vec<String>,
    },
    /// Simulated without a secret key; the caller signs these bytes.
    Unsigned {
        /// Forged operation bytes as hex.
        #[serde(rename = "unsignedOperation")]
        unsigned_operation: String,
    },
}

impl Submitted {
    /// The operation hash, if the operation was injected.
    pub fn op_hash(&self) -> Option<&str> {
        match self {
            Submitted::Injected { op_hash, .. } => Some(op_hash),
            Submitted::Unsigned { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceInfo {
    /// Balance in mutez.
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateInfo {
    /// Current delegate; empty when none is set.
    pub delegate: String,
}

/// Balance, delegate and counter of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub balance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    /// Current delegate; empty when none is set.
    pub delegate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submitted_shapes() {
        let injected = Submitted::Injected {
            op_hash: "ooHcT8UYjkYkVrxZJ2UbrxGTZz8RXbFWBxpDLzBGBVsKqjzFmhB".to_string(),
            new_kt1s: vec![],
        };
        assert_eq!(
            serde_json::to_value(&injected).unwrap(),
            json!({"opHash": "ooHcT8UYjkYkVrxZJ2UbrxGTZz8RXbFWBxpDLzBGBVsKqjzFmhB", "newKT1s": []})
        );
        let unsigned = Submitted::Unsigned { unsigned_operation: "00ff".to_string() };
        assert_eq!(
            serde_json::to_value(&unsigned).unwrap(),
            json!({"unsignedOperation": "00ff"})
        );
        assert_eq!(unsigned.op_hash(), None);
    }
}
