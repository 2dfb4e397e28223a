//! BIP-39 mnemonic handling.
//!
//! Only the English word list is accepted. The wallet seed is the first 32
//! bytes of the PBKDF2 seed, which is then used directly as an Ed25519 seed.

use bip39::Mnemonic;

use crate::keys::KeyPair;
use crate::PrimitivesError;

fn parse(mnemonic: &str) -> Result<Mnemonic, PrimitivesError> {
    Mnemonic::parse_normalized(mnemonic)
        .map_err(|e| PrimitivesError::InvalidMnemonic(e.to_string()))
}

/// Whether `mnemonic` is a well-formed BIP-39 phrase with a valid checksum.
pub fn valid_mnemonic(mnemonic: &str) -> bool {
    parse(mnemonic).is_ok()
}

/// Derive the 32-byte wallet seed of a mnemonic.
///
/// # Arguments
/// * `mnemonic` - The phrase.
/// * `passphrase` - Optional BIP-39 passphrase, empty for none.
///
/// # Returns
/// The first 32 bytes of the BIP-39 seed, or `InvalidMnemonic`.
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> Result<[u8; 32], PrimitivesError> {
    let full = parse(mnemonic)?.to_seed(passphrase);
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&full[..32]);
    Ok(seed)
}

/// Recover the entropy encoded by a mnemonic, as hex.
pub fn mnemonic_to_entropy(mnemonic: &str) -> Result<String, PrimitivesError> {
    Ok(hex::encode(parse(mnemonic)?.to_entropy()))
}

/// Derive an Ed25519 key pair from a wallet seed.
///
/// # Returns
/// `NullSeed` if the seed is empty.
pub fn seed_to_key_pair(seed: &[u8]) -> Result<KeyPair, PrimitivesError> {
    KeyPair::from_seed(seed)
}
