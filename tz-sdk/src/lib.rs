#![deny(missing_docs)]

//! Tezos wallet engine - Complete SDK.
//!
//! Re-exports all engine components for convenient single-crate usage.
//!
//! ```no_run
//! use tz_sdk::primitives::{KeyPair, SecretKey};
//! use tz_sdk::rpc::{RpcConfig, RpcGateway};
//! use tz_sdk::wallet::{OperationService, WalletConfig};
//! use tz_sdk::operation::TransferItem;
//!
//! # async fn run() {
//! let service = OperationService::new(RpcGateway::new(RpcConfig::default()), WalletConfig::default());
//! let keys = KeyPair::from_secret_key(SecretKey::from_ed25519_seed(&[7u8; 32]));
//! let transfer = TransferItem {
//!     destination: "tz1Ke2h7sDdakHJQh8WX4Z372du1KChsksyU".to_string(),
//!     amount: "1.5".to_string(),
//!     gas_limit: 10300,
//!     storage_limit: 257,
//!     parameters: None,
//! };
//! let outcome = service.transfer(keys.pkh(), &[transfer], "0.001", &keys, None).await;
//! println!("{}", serde_json::to_string(&outcome).unwrap_or_default());
//! # }
//! ```

pub use tz_operation as operation;
pub use tz_primitives as primitives;
pub use tz_rpc as rpc;
pub use tz_wallet as wallet;
