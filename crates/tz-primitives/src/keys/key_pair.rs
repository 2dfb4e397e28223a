//! In-memory key material for a single signing call.
//!
//! A `KeyPair` may hold only an address (watch-only), a public key, or a
//! full secret key. The address is always derived from the public key when
//! one is present, so the three fields can never disagree.

use crate::base58::{b58c_decode, Prefix};
use crate::keys::{PublicKey, SecretKey};
use crate::PrimitivesError;

/// Key material handed to the operation pipeline.
///
/// Holding no secret key routes the pipeline to simulation instead of
/// signing.
#[derive(Clone, Debug)]
pub struct KeyPair {
    sk: Option<SecretKey>,
    pk: Option<PublicKey>,
    pkh: String,
}

impl KeyPair {
    /// Build a key pair from a secret key. Public key and address are derived.
    pub fn from_secret_key(sk: SecretKey) -> Self {
        let pk = sk.public_key();
        let pkh = pk.pkh();
        KeyPair {
            sk: Some(sk),
            pk: Some(pk),
            pkh,
        }
    }

    /// Build a watch-only key pair from a public key.
    pub fn from_public_key(pk: PublicKey) -> Self {
        let pkh = pk.pkh();
        KeyPair {
            sk: None,
            pk: Some(pk),
            pkh,
        }
    }

    /// Build a key pair that only knows its implicit account address.
    ///
    /// # Arguments
    /// * `pkh` - A `tz1`, `tz2` or `tz3` address.
    ///
    /// # Returns
    /// `Ok(KeyPair)` or `InvalidAddress` if the text is not an implicit
    /// account address.
    pub fn address_only(pkh: &str) -> Result<Self, PrimitivesError> {
        let kind = match Prefix::detect(pkh) {
            Some(
                kind @ (Prefix::Ed25519PublicKeyHash
                | Prefix::Secp256k1PublicKeyHash
                | Prefix::P256PublicKeyHash),
            ) => kind,
            _ => return Err(PrimitivesError::InvalidAddress(pkh.to_string())),
        };
        b58c_decode(pkh, kind)?;
        Ok(KeyPair {
            sk: None,
            pk: None,
            pkh: pkh.to_string(),
        })
    }

    /// Derive an Ed25519 key pair from a 32-byte seed.
    ///
    /// # Returns
    /// `NullSeed` if `seed` is empty, `InvalidLength` if it is not 32 bytes.
    pub fn from_seed(seed: &[u8]) -> Result<Self, PrimitivesError> {
        if seed.is_empty() {
            return Err(PrimitivesError::NullSeed);
        }
        let bytes: [u8; 32] = seed.try_into().map_err(|_| PrimitivesError::InvalidLength {
            expected: 32,
            got: seed.len(),
        })?;
        Ok(Self::from_secret_key(SecretKey::from_ed25519_seed(&bytes)))
    }

    /// The secret key, if held.
    pub fn secret_key(&self) -> Option<&SecretKey> {
        self.sk.as_ref()
    }

    /// The public key, if known.
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.pk.as_ref()
    }

    /// The implicit account address.
    pub fn pkh(&self) -> &str {
        &self.pkh
    }

    /// Base58Check secret key text, if held.
    pub fn sk_b58(&self) -> Option<String> {
        self.sk.as_ref().map(SecretKey::to_b58)
    }

    /// Base58Check public key text, if known.
    pub fn pk_b58(&self) -> Option<String> {
        self.pk.as_ref().map(PublicKey::to_b58)
    }

    /// Drop the secret key, leaving a watch-only pair.
    pub fn without_secret(&self) -> Self {
        KeyPair {
            sk: None,
            pk: self.pk.clone(),
            pkh: self.pkh.clone(),
        }
    }
}
