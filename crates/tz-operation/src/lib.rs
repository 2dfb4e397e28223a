/// Tezos wallet engine - Operation model, building and forging.
///
/// Provides the typed operation contents, the builder that turns transfer,
/// delegation and batch intents into an operation group, the Micheline
/// templates for manager-contract relays and token calls, and the local
/// forger that guards against a dishonest node.

pub mod address;
pub mod amount;
pub mod builder;
pub mod content;
pub mod forge;
pub mod micheline;
pub mod script;
pub mod serde_util;
pub mod token;

mod error;
pub use error::OperationError;
pub use address::Address;
pub use builder::{AccountState, BatchItem, Limits, TransferItem};
pub use content::{ForgedOperation, ManagerFields, OperationContent, Script, TransactionParameters};
pub use micheline::Micheline;
pub use token::{Asset, AssetResolver, StaticAssets, TokenStandard};
