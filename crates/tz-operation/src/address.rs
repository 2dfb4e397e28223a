//! Account addresses and their binary forms.
//!
//! Implicit accounts (`tz1`/`tz2`/`tz3`) are key hashes; originated
//! accounts (`KT1`) are contract hashes. The forger needs two binary
//! encodings: the bare implicit form used for `source` fields, and the
//! tagged contract-id form used for `destination` fields.

use std::fmt;
use std::str::FromStr;

use tz_primitives::base58::{b58c_decode, b58c_encode, Prefix};
use tz_primitives::keys::Curve;
use tz_primitives::util::{ByteReader, ByteWriter};

use crate::OperationError;

/// A Tezos account address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Address {
    /// Key-hash account controlled by a key of `curve`.
    Implicit { curve: Curve, hash: [u8; 20] },
    /// Smart contract account.
    Originated([u8; 20]),
}

fn implicit_prefix(curve: Curve) -> Prefix {
    match curve {
        Curve::Ed25519 => Prefix::Ed25519PublicKeyHash,
        Curve::Secp256k1 => Prefix::Secp256k1PublicKeyHash,
        Curve::P256 => Prefix::P256PublicKeyHash,
    }
}

fn curve_tag(curve: Curve) -> u8 {
    match curve {
        Curve::Ed25519 => 0,
        Curve::Secp256k1 => 1,
        Curve::P256 => 2,
    }
}

fn curve_from_tag(tag: u8) -> Result<Curve, OperationError> {
    match tag {
        0 => Ok(Curve::Ed25519),
        1 => Ok(Curve::Secp256k1),
        2 => Ok(Curve::P256),
        other => Err(OperationError::Forge(format!("unknown key hash tag {other}"))),
    }
}

impl Address {
    /// Parse a `tz1`, `tz2`, `tz3` or `KT1` address.
    ///
    /// # Returns
    /// `Ok(Address)` or `InvalidAddress` if the text is not a checksummed
    /// address of a supported kind.
    pub fn parse(text: &str) -> Result<Self, OperationError> {
        let invalid = || OperationError::InvalidAddress(text.to_string());
        let (kind, curve) = match Prefix::detect(text).ok_or_else(invalid)? {
            Prefix::Ed25519PublicKeyHash => (Prefix::Ed25519PublicKeyHash, Some(Curve::Ed25519)),
            Prefix::Secp256k1PublicKeyHash => {
                (Prefix::Secp256k1PublicKeyHash, Some(Curve::Secp256k1))
            }
            Prefix::P256PublicKeyHash => (Prefix::P256PublicKeyHash, Some(Curve::P256)),
            Prefix::ContractHash => (Prefix::ContractHash, None),
            _ => return Err(invalid()),
        };
        let raw = b58c_decode(text, kind).map_err(|_| invalid())?;
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&raw);
        Ok(match curve {
            Some(curve) => Address::Implicit { curve, hash },
            None => Address::Originated(hash),
        })
    }

    /// Whether this is a key-hash account.
    pub fn is_implicit(&self) -> bool {
        matches!(self, Address::Implicit { .. })
    }

    /// Write the 21-byte implicit form (curve tag + hash).
    pub fn write_implicit(&self, writer: &mut ByteWriter) -> Result<(), OperationError> {
        match self {
            Address::Implicit { curve, hash } => {
                writer.write_u8(curve_tag(*curve));
                writer.write_bytes(hash);
                Ok(())
            }
            Address::Originated(_) => Err(OperationError::InvalidAddress(format!(
                "{self} is not an implicit account"
            ))),
        }
    }

    /// Write the 22-byte contract-id form.
    ///
    /// `00` + implicit form, or `01` + contract hash + `00` padding.
    pub fn write_contract_id(&self, writer: &mut ByteWriter) {
        match self {
            Address::Implicit { curve, hash } => {
                writer.write_u8(0);
                writer.write_u8(curve_tag(*curve));
                writer.write_bytes(hash);
            }
            Address::Originated(hash) => {
                writer.write_u8(1);
                writer.write_bytes(hash);
                writer.write_u8(0);
            }
        }
    }

    /// Read the 21-byte implicit form.
    pub fn read_implicit(reader: &mut ByteReader) -> Result<Self, OperationError> {
        let curve = curve_from_tag(reader.read_u8()?)?;
        let hash = reader.read_array::<20>()?;
        Ok(Address::Implicit { curve, hash })
    }

    /// Read the 22-byte contract-id form.
    pub fn read_contract_id(reader: &mut ByteReader) -> Result<Self, OperationError> {
        match reader.read_u8()? {
            0 => Self::read_implicit(reader),
            1 => {
                let hash = reader.read_array::<20>()?;
                let padding = reader.read_u8()?;
                if padding != 0 {
                    return Err(OperationError::Forge(format!(
                        "invalid contract id padding {padding:#04x}"
                    )));
                }
                Ok(Address::Originated(hash))
            }
            other => Err(OperationError::Forge(format!("unknown contract id tag {other}"))),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Address::Implicit { curve, hash } => b58c_encode(hash, implicit_prefix(*curve)),
            Address::Originated(hash) => b58c_encode(hash, Prefix::ContractHash),
        };
        f.write_str(&text)
    }
}

impl FromStr for Address {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

/// Whether `address` is a well-formed `tz1`/`tz2`/`tz3`/`KT1` address.
pub fn valid_address(address: &str) -> bool {
    Address::parse(address).is_ok()
}
