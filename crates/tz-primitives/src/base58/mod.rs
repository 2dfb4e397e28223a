//! Base58Check encoding and decoding with versioned prefixes.
//!
//! Every textual Tezos value (addresses, keys, signatures, block hashes) is
//! `base58(prefix || payload || checksum)` where the checksum is the first
//! four bytes of double SHA-256 over `prefix || payload`. The prefix bytes
//! make the text start with a recognizable tag such as `tz1` or `edsig`.

use crate::PrimitivesError;
use crate::hash::sha256d;

/// Symbolic kind of a Base58Check-encoded value.
///
/// Each kind maps to exactly one versioned byte prefix and one payload
/// length. The mapping is a static table and never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// Implicit account controlled by an Ed25519 key (`tz1`).
    Ed25519PublicKeyHash,
    /// Implicit account controlled by a secp256k1 key (`tz2`).
    Secp256k1PublicKeyHash,
    /// Implicit account controlled by a P-256 key (`tz3`).
    P256PublicKeyHash,
    /// Implicit account controlled by a BLS12-381 key (`tz4`).
    Bls12PublicKeyHash,
    /// Originated contract address (`KT1`).
    ContractHash,
    /// Ed25519 public key (`edpk`).
    Ed25519PublicKey,
    /// Compressed secp256k1 public key (`sppk`).
    Secp256k1PublicKey,
    /// Compressed P-256 public key (`p2pk`).
    P256PublicKey,
    /// Ed25519 expanded secret key, seed followed by public key (`edsk`, 64 bytes).
    Ed25519SecretKey,
    /// Ed25519 seed (`edsk`, 32 bytes).
    Ed25519Seed,
    /// secp256k1 secret scalar (`spsk`).
    Secp256k1SecretKey,
    /// Ed25519 signature (`edsig`).
    Ed25519Signature,
    /// secp256k1 signature (`spsig1`).
    Secp256k1Signature,
    /// Curve-agnostic signature (`sig`).
    GenericSignature,
    /// Block hash (`B`).
    BlockHash,
    /// Operation hash (`o`).
    OperationHash,
    /// Chain identifier (`Net`).
    ChainId,
}

/// Every prefix kind, in table order.
pub const ALL_PREFIXES: [Prefix; 17] = [
    Prefix::Ed25519PublicKeyHash,
    Prefix::Secp256k1PublicKeyHash,
    Prefix::P256PublicKeyHash,
    Prefix::Bls12PublicKeyHash,
    Prefix::ContractHash,
    Prefix::Ed25519PublicKey,
    Prefix::Secp256k1PublicKey,
    Prefix::P256PublicKey,
    Prefix::Ed25519SecretKey,
    Prefix::Ed25519Seed,
    Prefix::Secp256k1SecretKey,
    Prefix::Ed25519Signature,
    Prefix::Secp256k1Signature,
    Prefix::GenericSignature,
    Prefix::BlockHash,
    Prefix::OperationHash,
    Prefix::ChainId,
];

impl Prefix {
    /// The versioned bytes prepended to the payload before checksumming.
    pub const fn bytes(self) -> &'static [u8] {
        match self {
            Prefix::Ed25519PublicKeyHash => &[6, 161, 159],
            Prefix::Secp256k1PublicKeyHash => &[6, 161, 161],
            Prefix::P256PublicKeyHash => &[6, 161, 164],
            Prefix::Bls12PublicKeyHash => &[6, 161, 166],
            Prefix::ContractHash => &[2, 90, 121],
            Prefix::Ed25519PublicKey => &[13, 15, 37, 217],
            Prefix::Secp256k1PublicKey => &[3, 254, 226, 86],
            Prefix::P256PublicKey => &[3, 178, 139, 127],
            Prefix::Ed25519SecretKey => &[43, 246, 78, 7],
            Prefix::Ed25519Seed => &[13, 15, 58, 7],
            Prefix::Secp256k1SecretKey => &[17, 162, 224, 201],
            Prefix::Ed25519Signature => &[9, 245, 205, 134, 18],
            Prefix::Secp256k1Signature => &[13, 115, 101, 19, 63],
            Prefix::GenericSignature => &[4, 130, 43],
            Prefix::BlockHash => &[1, 52],
            Prefix::OperationHash => &[5, 116],
            Prefix::ChainId => &[87, 82, 0],
        }
    }

    /// Expected payload length in bytes for this kind.
    pub const fn payload_len(self) -> usize {
        match self {
            Prefix::Ed25519PublicKeyHash
            | Prefix::Secp256k1PublicKeyHash
            | Prefix::P256PublicKeyHash
            | Prefix::Bls12PublicKeyHash
            | Prefix::ContractHash => 20,
            Prefix::Ed25519PublicKey => 32,
            Prefix::Secp256k1PublicKey | Prefix::P256PublicKey => 33,
            Prefix::Ed25519SecretKey => 64,
            Prefix::Ed25519Seed | Prefix::Secp256k1SecretKey => 32,
            Prefix::Ed25519Signature
            | Prefix::Secp256k1Signature
            | Prefix::GenericSignature => 64,
            Prefix::BlockHash | Prefix::OperationHash => 32,
            Prefix::ChainId => 4,
        }
    }

    /// The human-readable text tag an encoded value starts with.
    pub const fn tag(self) -> &'static str {
        match self {
            Prefix::Ed25519PublicKeyHash => "tz1",
            Prefix::Secp256k1PublicKeyHash => "tz2",
            Prefix::P256PublicKeyHash => "tz3",
            Prefix::Bls12PublicKeyHash => "tz4",
            Prefix::ContractHash => "KT1",
            Prefix::Ed25519PublicKey => "edpk",
            Prefix::Secp256k1PublicKey => "sppk",
            Prefix::P256PublicKey => "p2pk",
            Prefix::Ed25519SecretKey | Prefix::Ed25519Seed => "edsk",
            Prefix::Secp256k1SecretKey => "spsk",
            Prefix::Ed25519Signature => "edsig",
            Prefix::Secp256k1Signature => "spsig1",
            Prefix::GenericSignature => "sig",
            Prefix::BlockHash => "B",
            Prefix::OperationHash => "o",
            Prefix::ChainId => "Net",
        }
    }

    /// Find the prefix kind of an encoded value by decoding it.
    ///
    /// Tries every table entry whose prefix bytes and payload length match
    /// the decoded data. Returns `None` if the text is not valid
    /// Base58Check or matches no entry.
    pub fn detect(text: &str) -> Option<Prefix> {
        let data = check_decode(text).ok()?;
        ALL_PREFIXES.into_iter().find(|p| {
            let bytes = p.bytes();
            data.len() == bytes.len() + p.payload_len() && data.starts_with(bytes)
        })
    }
}

/// Encode a byte slice to a raw Base58 string (Bitcoin alphabet).
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decode a raw Base58 string to bytes.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))
}

/// Encode a byte slice with a 4-byte double-SHA-256 checksum appended.
pub fn check_encode(data: &[u8]) -> String {
    let checksum = sha256d(data);
    let mut payload = data.to_vec();
    payload.extend_from_slice(&checksum[..4]);
    encode(&payload)
}

/// Decode a Base58Check string, verifying and stripping the checksum.
pub fn check_decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let decoded = decode(s)?;
    if decoded.len() < 4 {
        return Err(PrimitivesError::InvalidBase58(
            "data too short for checksum".to_string(),
        ));
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - 4);
    let expected = sha256d(payload);
    if checksum != &expected[..4] {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

/// Encode `payload` under the versioned prefix of `kind`.
///
/// # Arguments
/// * `payload` - Raw bytes (key, hash or signature).
/// * `kind` - The prefix kind selecting the version bytes.
///
/// # Returns
/// The Base58Check text, e.g. `tz1...` for an Ed25519 key hash.
pub fn b58c_encode(payload: &[u8], kind: Prefix) -> String {
    let mut data = Vec::with_capacity(kind.bytes().len() + payload.len());
    data.extend_from_slice(kind.bytes());
    data.extend_from_slice(payload);
    check_encode(&data)
}

/// Decode Base58Check text that must carry the prefix of `kind`.
///
/// # Arguments
/// * `text` - The encoded value.
/// * `kind` - The expected prefix kind.
///
/// # Returns
/// The payload with prefix and checksum removed, or an error if the
/// checksum, the prefix bytes or the payload length do not match.
pub fn b58c_decode(text: &str, kind: Prefix) -> Result<Vec<u8>, PrimitivesError> {
    let data = check_decode(text)?;
    let prefix = kind.bytes();
    if !data.starts_with(prefix) {
        return Err(PrimitivesError::PrefixMismatch { expected: kind.tag() });
    }
    let payload = &data[prefix.len()..];
    if payload.len() != kind.payload_len() {
        return Err(PrimitivesError::InvalidLength {
            expected: kind.payload_len(),
            got: payload.len(),
        });
    }
    Ok(payload.to_vec())
}
