//! Hash function primitives.
//!
//! BLAKE2b is the protocol hash: 32-byte digests are what gets signed and
//! 20-byte digests of public keys are account addresses. SHA-256d is only
//! used for the Base58Check checksum.

use blake2::digest::consts::{U20, U32};
use blake2::Blake2b;
use sha2::{Digest, Sha256};

type Blake2b256 = Blake2b<U32>;
type Blake2b160 = Blake2b<U20>;

/// Compute SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256: SHA-256(SHA-256(data)).
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute the 32-byte BLAKE2b digest of the input data.
///
/// This is the digest signed for operations, blocks and expressions.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte BLAKE2b digest.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the 20-byte BLAKE2b digest of the input data.
///
/// Used to derive an implicit account address from a public key.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 20-byte BLAKE2b digest.
pub fn blake2b_160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Blake2b160::new();
    hasher.update(data);
    hasher.finalize().into()
}
