#![deny(missing_docs)]

//! # tz-rpc
//!
//! Node RPC gateway for submitting Tezos operations: round-robin endpoint
//! selection with bounded retry on transport failures, typed endpoints for
//! the account, forge, simulate, preapply and inject calls, and the
//! classifier that turns applied-operation metadata into a failure cause.
//!
//! # Example
//!
//! ```no_run
//! use tz_rpc::{RpcConfig, RpcGateway};
//!
//! let gateway = RpcGateway::new(RpcConfig {
//!     endpoints: vec![
//!         "https://mainnet.api.tez.ie".to_string(),
//!         "https://mainnet.smartpy.io".to_string(),
//!     ],
//!     ..Default::default()
//! });
//! ```

pub mod classifier;
pub mod error;
pub mod gateway;
pub mod node;
pub mod types;


pub use classifier::{check_applied, originated_contracts, AppliedSource, ErrorCause};
pub use error::RpcError;
pub use gateway::RpcGateway;
pub use types::{AppliedOperation, BlockHeader, ContractInfo, NodeError, RpcConfig};
