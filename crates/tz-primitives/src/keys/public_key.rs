//! Public keys and implicit account addresses.
//!
//! An implicit account address is the Base58Check encoding of the 20-byte
//! BLAKE2b digest of the raw public key, under the key-hash prefix of the
//! key's curve. secp256k1 keys are always held compressed; `decompress`
//! recovers the affine `(X, Y)` pair for external lookup services.

use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::base58::{b58c_decode, b58c_encode, Prefix};
use crate::hash::blake2b_160;
use crate::keys::Curve;
use crate::PrimitivesError;

/// Length of a compressed SEC1 point (prefix + 32 byte x-coordinate).
const COMPRESSED_LEN: usize = 33;

/// An uncompressed secp256k1 point as two 64-character lower-case hex strings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PublicKeyPoint {
    /// X coordinate, zero-padded to 32 bytes.
    #[serde(rename = "X")]
    pub x: String,
    /// Y coordinate, zero-padded to 32 bytes.
    #[serde(rename = "Y")]
    pub y: String,
}

/// A public key of one of the supported curves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    /// Ed25519 verifying key (`edpk`).
    Ed25519(ed25519_dalek::VerifyingKey),
    /// secp256k1 public key (`sppk`).
    Secp256k1(k256::PublicKey),
    /// Compressed P-256 key bytes (`p2pk`). Kept opaque.
    P256([u8; COMPRESSED_LEN]),
}

impl PublicKey {
    /// Parse a Base58Check public key (`edpk`, `sppk` or `p2pk`).
    ///
    /// # Arguments
    /// * `text` - The encoded public key.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or `InvalidPublicKey` if the prefix is
    /// unknown or the bytes are not a valid point.
    pub fn from_b58(text: &str) -> Result<Self, PrimitivesError> {
        match Prefix::detect(text) {
            Some(Prefix::Ed25519PublicKey) => {
                let raw = b58c_decode(text, Prefix::Ed25519PublicKey)?;
                Self::from_raw(Curve::Ed25519, &raw)
            }
            Some(Prefix::Secp256k1PublicKey) => {
                let raw = b58c_decode(text, Prefix::Secp256k1PublicKey)?;
                Self::from_raw(Curve::Secp256k1, &raw)
            }
            Some(Prefix::P256PublicKey) => {
                let raw = b58c_decode(text, Prefix::P256PublicKey)?;
                Self::from_raw(Curve::P256, &raw)
            }
            _ => Err(PrimitivesError::InvalidPublicKey(format!(
                "unrecognized public key: {text}"
            ))),
        }
    }

    /// Build a public key from raw bytes of the given curve.
    ///
    /// Ed25519 keys are 32 bytes; secp256k1 and P-256 keys are 33-byte
    /// compressed points.
    pub fn from_raw(curve: Curve, raw: &[u8]) -> Result<Self, PrimitivesError> {
        match curve {
            Curve::Ed25519 => {
                let bytes: [u8; 32] = raw.try_into().map_err(|_| PrimitivesError::InvalidLength {
                    expected: 32,
                    got: raw.len(),
                })?;
                ed25519_dalek::VerifyingKey::from_bytes(&bytes)
                    .map(PublicKey::Ed25519)
                    .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))
            }
            Curve::Secp256k1 => {
                if raw.len() != COMPRESSED_LEN {
                    return Err(PrimitivesError::InvalidLength {
                        expected: COMPRESSED_LEN,
                        got: raw.len(),
                    });
                }
                k256::PublicKey::from_sec1_bytes(raw)
                    .map(PublicKey::Secp256k1)
                    .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))
            }
            Curve::P256 => {
                let bytes: [u8; COMPRESSED_LEN] =
                    raw.try_into().map_err(|_| PrimitivesError::InvalidLength {
                        expected: COMPRESSED_LEN,
                        got: raw.len(),
                    })?;
                Ok(PublicKey::P256(bytes))
            }
        }
    }

    /// Build a secp256k1 public key from affine coordinates.
    ///
    /// # Arguments
    /// * `x_hex` - X coordinate as hex, at most 64 characters.
    /// * `y_hex` - Y coordinate as hex, at most 64 characters.
    ///
    /// # Returns
    /// `Ok(PublicKey::Secp256k1)` if the point lies on the curve.
    pub fn from_point(x_hex: &str, y_hex: &str) -> Result<Self, PrimitivesError> {
        let mut sec1 = Vec::with_capacity(65);
        sec1.push(0x04);
        sec1.extend_from_slice(&coordinate_bytes(x_hex)?);
        sec1.extend_from_slice(&coordinate_bytes(y_hex)?);
        k256::PublicKey::from_sec1_bytes(&sec1)
            .map(PublicKey::Secp256k1)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))
    }

    /// The curve family of this key.
    pub fn curve(&self) -> Curve {
        match self {
            PublicKey::Ed25519(_) => Curve::Ed25519,
            PublicKey::Secp256k1(_) => Curve::Secp256k1,
            PublicKey::P256(_) => Curve::P256,
        }
    }

    /// Raw key bytes as they appear on the wire (compressed for secp256k1).
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Ed25519(vk) => vk.to_bytes().to_vec(),
            PublicKey::Secp256k1(pk) => pk.to_encoded_point(true).as_bytes().to_vec(),
            PublicKey::P256(bytes) => bytes.to_vec(),
        }
    }

    /// Base58Check text of the key (`edpk...`, `sppk...`, `p2pk...`).
    pub fn to_b58(&self) -> String {
        let prefix = match self.curve() {
            Curve::Ed25519 => Prefix::Ed25519PublicKey,
            Curve::Secp256k1 => Prefix::Secp256k1PublicKey,
            Curve::P256 => Prefix::P256PublicKey,
        };
        b58c_encode(&self.to_bytes(), prefix)
    }

    /// The implicit account address controlled by this key.
    ///
    /// # Returns
    /// `tz1...`, `tz2...` or `tz3...` depending on the curve.
    pub fn pkh(&self) -> String {
        let prefix = match self.curve() {
            Curve::Ed25519 => Prefix::Ed25519PublicKeyHash,
            Curve::Secp256k1 => Prefix::Secp256k1PublicKeyHash,
            Curve::P256 => Prefix::P256PublicKeyHash,
        };
        b58c_encode(&blake2b_160(&self.to_bytes()), prefix)
    }

    /// Recover the uncompressed `(X, Y)` coordinates of a secp256k1 key.
    ///
    /// # Returns
    /// The point, or `InvalidPublicKey` for keys of other curves.
    pub fn decompress(&self) -> Result<PublicKeyPoint, PrimitivesError> {
        match self {
            PublicKey::Secp256k1(pk) => {
                let point = pk.to_encoded_point(false);
                let xy = &point.as_bytes()[1..];
                Ok(PublicKeyPoint {
                    x: hex::encode(&xy[..32]),
                    y: hex::encode(&xy[32..]),
                })
            }
            _ => Err(PrimitivesError::InvalidPublicKey(
                "only secp256k1 keys can be decompressed".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_b58())
    }
}

/// Derive the implicit account address of a Base58Check public key.
pub fn pk_to_pkh(pk: &str) -> Result<String, PrimitivesError> {
    Ok(PublicKey::from_b58(pk)?.pkh())
}

/// Derive the `tz2` address of an uncompressed secp256k1 point given as hex.
pub fn points_to_pkh(x_hex: &str, y_hex: &str) -> Result<String, PrimitivesError> {
    Ok(PublicKey::from_point(x_hex, y_hex)?.pkh())
}

/// Decode a `sppk` key into its uncompressed coordinates.
pub fn decompress(sppk: &str) -> Result<PublicKeyPoint, PrimitivesError> {
    let raw = b58c_decode(sppk, Prefix::Secp256k1PublicKey)?;
    PublicKey::from_raw(Curve::Secp256k1, &raw)?.decompress()
}

/// Convert a hex-encoded Ed25519 key with a leading tag byte to `edpk`.
///
/// The first byte (tag) is skipped and the following 32 bytes are encoded.
pub fn hex_to_pk(hex_str: &str) -> Result<String, PrimitivesError> {
    if hex_str.len() < 66 {
        return Err(PrimitivesError::InvalidLength {
            expected: 33,
            got: hex_str.len() / 2,
        });
    }
    let raw = crate::util::hex_to_bytes(&hex_str[2..66])?;
    Ok(b58c_encode(&raw, Prefix::Ed25519PublicKey))
}

/// Left-pad a hex coordinate to 32 bytes.
fn coordinate_bytes(hex_str: &str) -> Result<[u8; 32], PrimitivesError> {
    if hex_str.len() > 64 {
        return Err(PrimitivesError::InvalidPublicKey(format!(
            "coordinate too long: {} hex characters",
            hex_str.len()
        )));
    }
    let padded = format!("{:0>64}", hex_str);
    let bytes = crate::util::hex_to_bytes(&padded)?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SecretKey;

    #[test]
    fn test_decompress_then_points_roundtrip() {
        let sk = SecretKey::from_secp256k1_hex(
            "0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        let pk = sk.public_key();
        let point = pk.decompress().unwrap();
        // The generator point.
        assert_eq!(
            point.x,
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(
            point.y,
            "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
        );
        assert_eq!(points_to_pkh(&point.x, &point.y).unwrap(), pk.pkh());
        assert_eq!(decompress(&pk.to_b58()).unwrap(), point);
    }

    #[test]
    fn test_ed25519_key_cannot_be_decompressed() {
        let sk = SecretKey::from_ed25519_seed(&[1u8; 32]);
        assert!(sk.public_key().decompress().is_err());
    }

    #[test]
    fn test_pkh_prefix_follows_curve() {
        let ed = SecretKey::from_ed25519_seed(&[2u8; 32]).public_key();
        assert!(ed.pkh().starts_with("tz1"));
        let sp = SecretKey::from_secp256k1_hex(&"11".repeat(32)).unwrap().public_key();
        assert!(sp.pkh().starts_with("tz2"));
        assert_eq!(pk_to_pkh(&sp.to_b58()).unwrap(), sp.pkh());
    }

    #[test]
    fn test_hex_to_pk_skips_tag() {
        let ed = SecretKey::from_ed25519_seed(&[3u8; 32]).public_key();
        let tagged = format!("00{}", hex::encode(ed.to_bytes()));
        assert_eq!(hex_to_pk(&tagged).unwrap(), ed.to_b58());
    }

    #[test]
    fn test_from_b58_rejects_address() {
        let err = PublicKey::from_b58("tz1Ke2h7sDdakHJQh8WX4Z372du1KChsksyU").unwrap_err();
        assert!(matches!(err, PrimitivesError::InvalidPublicKey(_)));
    }
}
