//! Secret keys for the two signing curves.
//!
//! Ed25519 keys are accepted as 64-byte expanded keys (`edsk`, seed then
//! public key) or 32-byte seeds (`edsk`, shorter text). secp256k1 keys are
//! 32-byte scalars (`spsk`) or 64-character hex strings.

use crate::base58::{b58c_decode, b58c_encode, Prefix};
use crate::keys::{Curve, PublicKey};
use crate::PrimitivesError;

/// A secret key able to produce signatures.
#[derive(Clone, Debug)]
pub enum SecretKey {
    /// Ed25519 signing key.
    Ed25519(ed25519_dalek::SigningKey),
    /// secp256k1 signing key.
    Secp256k1(k256::ecdsa::SigningKey),
}

impl SecretKey {
    /// Parse a Base58Check secret key (`edsk` or `spsk`).
    ///
    /// # Arguments
    /// * `text` - The encoded secret key.
    ///
    /// # Returns
    /// `Ok(SecretKey)` on success, or `InvalidSecretKey` if the prefix is
    /// not a secret-key prefix or the scalar is out of range.
    pub fn from_b58(text: &str) -> Result<Self, PrimitivesError> {
        match Prefix::detect(text) {
            Some(Prefix::Ed25519SecretKey) => {
                let raw = b58c_decode(text, Prefix::Ed25519SecretKey)?;
                let mut bytes = [0u8; 64];
                bytes.copy_from_slice(&raw);
                ed25519_dalek::SigningKey::from_keypair_bytes(&bytes)
                    .map(SecretKey::Ed25519)
                    .map_err(|e| PrimitivesError::InvalidSecretKey(e.to_string()))
            }
            Some(Prefix::Ed25519Seed) => {
                let raw = b58c_decode(text, Prefix::Ed25519Seed)?;
                let mut seed = [0u8; 32];
                seed.copy_from_slice(&raw);
                Ok(Self::from_ed25519_seed(&seed))
            }
            Some(Prefix::Secp256k1SecretKey) => {
                let raw = b58c_decode(text, Prefix::Secp256k1SecretKey)?;
                Ok(SecretKey::Secp256k1(k256::ecdsa::SigningKey::from_slice(&raw)?))
            }
            _ => Err(PrimitivesError::InvalidSecretKey(
                "unrecognized secret key prefix".to_string(),
            )),
        }
    }

    /// Create an Ed25519 key from a 32-byte seed.
    pub fn from_ed25519_seed(seed: &[u8; 32]) -> Self {
        SecretKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(seed))
    }

    /// Create a secp256k1 key from a 64-character hex scalar.
    pub fn from_secp256k1_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let raw = crate::util::hex_to_bytes(hex_str)?;
        if raw.len() != 32 {
            return Err(PrimitivesError::InvalidLength { expected: 32, got: raw.len() });
        }
        Ok(SecretKey::Secp256k1(k256::ecdsa::SigningKey::from_slice(&raw)?))
    }

    /// Parse a secp256k1 secret given either as hex or as `spsk` text.
    ///
    /// # Arguments
    /// * `secret` - 64 lower-case hex characters or a 54-character `spsk` string.
    pub fn parse_secp256k1(secret: &str) -> Result<Self, PrimitivesError> {
        let is_hex = secret.len() == 64
            && secret.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if is_hex {
            return Self::from_secp256k1_hex(secret);
        }
        if secret.len() == 54 && secret.starts_with("spsk") {
            let raw = b58c_decode(secret, Prefix::Secp256k1SecretKey)?;
            return Ok(SecretKey::Secp256k1(k256::ecdsa::SigningKey::from_slice(&raw)?));
        }
        Err(PrimitivesError::InvalidSecretKey("Invalid private key".to_string()))
    }

    /// The curve family of this key.
    pub fn curve(&self) -> Curve {
        match self {
            SecretKey::Ed25519(_) => Curve::Ed25519,
            SecretKey::Secp256k1(_) => Curve::Secp256k1,
        }
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            SecretKey::Ed25519(sk) => PublicKey::Ed25519(sk.verifying_key()),
            SecretKey::Secp256k1(sk) => PublicKey::Secp256k1(sk.verifying_key().clone().into()),
        }
    }

    /// Base58Check text of the key.
    ///
    /// Ed25519 keys are emitted in the 64-byte expanded `edsk` form.
    pub fn to_b58(&self) -> String {
        match self {
            SecretKey::Ed25519(sk) => b58c_encode(&sk.to_keypair_bytes(), Prefix::Ed25519SecretKey),
            SecretKey::Secp256k1(sk) => b58c_encode(&sk.to_bytes(), Prefix::Secp256k1SecretKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ed25519_b58_roundtrip_both_forms() {
        let sk = SecretKey::from_ed25519_seed(&[9u8; 32]);
        let expanded = sk.to_b58();
        assert!(expanded.starts_with("edsk"));
        let parsed = SecretKey::from_b58(&expanded).unwrap();
        assert_eq!(parsed.public_key(), sk.public_key());

        let seed_text = b58c_encode(&[9u8; 32], Prefix::Ed25519Seed);
        let from_seed = SecretKey::from_b58(&seed_text).unwrap();
        assert_eq!(from_seed.public_key(), sk.public_key());
    }

    #[test]
    fn test_secp256k1_hex_and_b58_agree() {
        let hex_secret = "ab".repeat(32);
        let from_hex = SecretKey::parse_secp256k1(&hex_secret).unwrap();
        let text = from_hex.to_b58();
        assert!(text.starts_with("spsk"));
        assert_eq!(text.len(), 54);
        let from_text = SecretKey::parse_secp256k1(&text).unwrap();
        assert_eq!(from_text.public_key(), from_hex.public_key());
    }

    #[test]
    fn test_secp256k1_rejects_garbage() {
        assert!(SecretKey::parse_secp256k1("not a key").is_err());
        assert!(SecretKey::from_secp256k1_hex(&"00".repeat(32)).is_err());
    }

    #[test]
    fn test_public_key_rejected_as_secret() {
        let pk = SecretKey::from_ed25519_seed(&[1u8; 32]).public_key().to_b58();
        assert!(SecretKey::from_b58(&pk).is_err());
    }
}
