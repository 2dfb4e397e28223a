//! Remote public-key lookup for `tz2` accounts.
//!
//! A lookup service maps an uncompressed secp256k1 point to whatever it
//! knows about the key's owner. Answers are only trusted when they echo the
//! point that was asked for.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tz_primitives::keys::PublicKeyPoint;

use crate::error::WalletError;

/// Answer of a [`KeyLookupService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLookupAnswer {
    /// The point the answer is about.
    #[serde(rename = "pubKey")]
    pub public_key: PublicKeyPoint,
    /// Service-specific owner data.
    #[serde(default)]
    pub payload: Value,
}

/// External directory of secp256k1 public keys.
///
/// Implementations are expected to be async (HTTP calls etc.).
pub trait KeyLookupService: Send + Sync {
    /// Look up the owner of `point`.
    fn lookup(
        &self,
        point: &PublicKeyPoint,
    ) -> impl Future<Output = Result<KeyLookupAnswer, WalletError>> + Send;
}

/// Outcome of [`OperationService::lookup_key`](crate::OperationService::lookup_key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLookup {
    /// The account has not revealed its key yet.
    NoReveal,
    /// The service answered for the revealed key.
    Found(KeyLookupAnswer),
}
