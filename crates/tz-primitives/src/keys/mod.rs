/// Ed25519 and secp256k1 keys.
///
/// Provides secret keys, public keys, implicit account address derivation,
/// secp256k1 point (de)compression, and the in-memory key pair used for a
/// single signing call.

pub mod secret_key;
pub mod public_key;
pub mod key_pair;

pub use key_pair::KeyPair;
pub use public_key::{PublicKey, PublicKeyPoint};
pub use secret_key::SecretKey;

/// Signature curve family of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// Ed25519 (tz1 accounts).
    Ed25519,
    /// secp256k1 (tz2 accounts).
    Secp256k1,
    /// NIST P-256 (tz3 accounts). Only key hashing is supported.
    P256,
}
