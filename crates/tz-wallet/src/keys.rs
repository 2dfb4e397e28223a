//! Key and address helpers exposed to wallet callers.

pub use tz_operation::address::valid_address;
pub use tz_primitives::keys::public_key::{decompress, hex_to_pk, pk_to_pkh, points_to_pkh};
pub use tz_primitives::keys::{KeyPair, PublicKeyPoint, SecretKey};
pub use tz_primitives::mnemonic::{
    mnemonic_to_entropy, mnemonic_to_seed, seed_to_key_pair, valid_mnemonic,
};
pub use tz_primitives::signer::{hexsig_to_edsig, sig_to_prefixed_sig};
pub use tz_primitives::util::{decode_string, zarith_decode, zarith_decode_int};

use crate::error::WalletError;

/// secp256k1 key pair from 64 hex characters or `spsk…` text.
pub fn secp256k1_key_pair(secret: &str) -> Result<KeyPair, WalletError> {
    let sk = SecretKey::parse_secp256k1(secret)?;
    Ok(KeyPair::from_secret_key(sk))
}

/// Ed25519 key pair of a mnemonic, using the first 32 bytes of its seed.
pub fn mnemonic_to_key_pair(mnemonic: &str, passphrase: &str) -> Result<KeyPair, WalletError> {
    let seed = mnemonic_to_seed(mnemonic, passphrase)?;
    Ok(seed_to_key_pair(&seed)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_HEX: &str = "0101010101010101010101010101010101010101010101010101010101010101";

    #[test]
    fn test_secp256k1_key_pair_forms_agree() {
        let from_hex = secp256k1_key_pair(SECRET_HEX).unwrap();
        assert!(from_hex.pkh().starts_with("tz2"));
        assert!(from_hex.pk_b58().unwrap().starts_with("sppk"));

        let spsk = from_hex.sk_b58().unwrap();
        assert!(spsk.starts_with("spsk"));
        let from_text = secp256k1_key_pair(&spsk).unwrap();
        assert_eq!(from_text.pkh(), from_hex.pkh());
    }

    #[test]
    fn test_decompressed_point_hashes_to_address() {
        let pair = secp256k1_key_pair(SECRET_HEX).unwrap();
        let point = decompress(&pair.pk_b58().unwrap()).unwrap();
        assert_eq!(point.x.len(), 64);
        assert_eq!(points_to_pkh(&point.x, &point.y).unwrap(), pair.pkh());
    }

    #[test]
    fn test_rejects_bad_secret() {
        let err = secp256k1_key_pair("zz").unwrap_err();
        assert_eq!(err.code(), "InvalidPrivateKey");
    }

    #[test]
    fn test_mnemonic_key_pair() {
        let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        assert!(valid_mnemonic(mnemonic));
        let pair = mnemonic_to_key_pair(mnemonic, "").unwrap();
        assert!(pair.pkh().starts_with("tz1"));
        assert!(mnemonic_to_key_pair("not a mnemonic", "").is_err());
    }
}
