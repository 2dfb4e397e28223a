/// Tezos wallet engine - Cryptographic primitives, encoding, and keys.
///
/// This crate provides the foundational building blocks of the engine:
/// - Base58Check encoding with the static versioned prefix table
/// - Hash functions (BLAKE2b-256/160, SHA-256d)
/// - Hex conversion, byte reader/writer and zarith integers
/// - Ed25519 and secp256k1 keys, key pairs and address hashes
/// - Watermarked signing and Ed25519 verification
/// - BIP39 mnemonic to seed derivation

pub mod base58;
pub mod hash;
pub mod util;
pub mod keys;
pub mod signer;
pub mod mnemonic;

mod error;
pub use error::PrimitivesError;
pub use base58::Prefix;
pub use keys::{KeyPair, PublicKey, SecretKey};
pub use signer::{SignedBytes, Watermark};
