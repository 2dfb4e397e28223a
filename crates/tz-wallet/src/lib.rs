/// Tezos wallet engine - Operation orchestration.
///
/// Drives every public wallet operation through the same pipeline: fetch
/// account state, build, forge and verify, sign or simulate, preapply,
/// classify and inject. Each call answers with an [`Outcome`] instead of
/// raising, so callers see one result shape for success and failure.

mod error;
pub use error::WalletError;

pub mod config;
pub mod key_lookup;
pub mod keys;
pub mod outcome;
pub mod service;
pub mod types;

pub use config::WalletConfig;
pub use key_lookup::{KeyLookup, KeyLookupAnswer, KeyLookupService};
pub use outcome::{ErrorRenderer, FailurePayload, Outcome, PlainRenderer};
pub use service::{OperationService, PLACEHOLDER_SIGNATURE};
pub use types::{AccountInfo, BalanceInfo, DelegateInfo, Submitted};
