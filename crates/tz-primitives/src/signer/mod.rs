//! Watermarked signing and Ed25519 verification.
//!
//! The input to `sign` starts with a one-byte watermark naming the class of
//! data being signed. The BLAKE2b-256 digest is taken over the whole
//! watermarked input; the watermark is then dropped from the payload that is
//! concatenated with the signature for broadcast.

use ed25519_dalek::{Signer, Verifier};
use k256::ecdsa::signature::hazmat::PrehashSigner;

use crate::base58::{b58c_decode, b58c_encode, Prefix};
use crate::hash::blake2b_256;
use crate::keys::{PublicKey, SecretKey};
use crate::util::{bytes_to_hex, hex_to_bytes};
use crate::PrimitivesError;

/// Length of a raw signature for either curve.
pub const SIGNATURE_LEN: usize = 64;

/// Leading byte identifying the class of signed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watermark {
    /// Manager and anonymous operations.
    GenericOperation,
    /// Script expressions (packed Michelson data).
    Expression,
    /// Block-class data.
    Block,
}

impl Watermark {
    /// The watermark byte.
    pub const fn byte(self) -> u8 {
        match self {
            Watermark::GenericOperation => 0x03,
            Watermark::Expression => 0x05,
            Watermark::Block => 0x80,
        }
    }

    /// Parse a watermark byte.
    pub fn from_byte(byte: u8) -> Result<Self, PrimitivesError> {
        match byte {
            0x03 => Ok(Watermark::GenericOperation),
            0x05 => Ok(Watermark::Expression),
            0x80 => Ok(Watermark::Block),
            other => Err(PrimitivesError::InvalidWatermark(other)),
        }
    }

    /// Prepend this watermark to `payload`.
    pub fn apply(self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(payload.len() + 1);
        out.push(self.byte());
        out.extend_from_slice(payload);
        out
    }
}

/// The result of signing watermarked bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBytes {
    /// The signed payload without its watermark, as hex.
    pub bytes: String,
    /// Raw 64-byte signature.
    pub signature: Vec<u8>,
    /// Base58Check signature text (`edsig...` or `spsig1...`).
    pub encoded_signature: String,
    /// `bytes || signature` as hex, ready for injection.
    pub signed_payload_hex: String,
}

/// Sign watermarked bytes with a secret key.
///
/// # Arguments
/// * `watermarked` - Bytes starting with a watermark byte.
/// * `sk` - The secret key; its curve selects the algorithm.
///
/// # Returns
/// The signature in raw and encoded forms plus the broadcast payload, or
/// `InvalidWatermark` if the first byte is not a known watermark.
pub fn sign(watermarked: &[u8], sk: &SecretKey) -> Result<SignedBytes, PrimitivesError> {
    let first = *watermarked.first().ok_or(PrimitivesError::UnexpectedEof)?;
    Watermark::from_byte(first)?;

    let digest = blake2b_256(watermarked);
    let payload = &watermarked[1..];

    let (signature, prefix) = match sk {
        SecretKey::Ed25519(key) => (key.sign(&digest).to_bytes().to_vec(), Prefix::Ed25519Signature),
        SecretKey::Secp256k1(key) => {
            let sig: k256::ecdsa::Signature = key
                .sign_prehash(&digest)
                .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
            // Canonical signatures only.
            let sig = sig.normalize_s().unwrap_or(sig);
            (sig.to_bytes().to_vec(), Prefix::Secp256k1Signature)
        }
    };

    let bytes = bytes_to_hex(payload);
    let signed_payload_hex = format!("{}{}", bytes, bytes_to_hex(&signature));
    Ok(SignedBytes {
        bytes,
        encoded_signature: b58c_encode(&signature, prefix),
        signature,
        signed_payload_hex,
    })
}

/// Sign hex-encoded watermarked bytes.
pub fn sign_hex(watermarked_hex: &str, sk: &SecretKey) -> Result<SignedBytes, PrimitivesError> {
    sign(&hex_to_bytes(watermarked_hex)?, sk)
}

/// Verify an Ed25519 signature over the BLAKE2b-256 digest of `bytes`.
///
/// `bytes` is hashed exactly as given; callers verifying an operation must
/// include the watermark themselves. secp256k1 verification is not
/// supported and yields `false`, as does any malformed input.
///
/// # Arguments
/// * `bytes` - The signed data.
/// * `encoded_signature` - `edsig...` or generic `sig...` text.
/// * `pk` - `edpk...` text.
pub fn verify(bytes: &[u8], encoded_signature: &str, pk: &str) -> bool {
    let Ok(PublicKey::Ed25519(vk)) = PublicKey::from_b58(pk) else {
        return false;
    };
    let Ok(raw) = decode_signature(encoded_signature) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(&raw);
    vk.verify(&blake2b_256(bytes), &signature).is_ok()
}

/// Decode a signature of any supported prefix into its 64 raw bytes.
///
/// The prefix is detected from the text, so `edsig`, `spsig1` and generic
/// `sig` encodings are all accepted.
pub fn decode_signature(encoded: &str) -> Result<[u8; SIGNATURE_LEN], PrimitivesError> {
    let kind = match Prefix::detect(encoded) {
        Some(
            kind @ (Prefix::Ed25519Signature
            | Prefix::Secp256k1Signature
            | Prefix::GenericSignature),
        ) => kind,
        _ => {
            return Err(PrimitivesError::InvalidSignature(format!(
                "unrecognized signature: {encoded}"
            )))
        }
    };
    let raw = b58c_decode(encoded, kind)?;
    let mut out = [0u8; SIGNATURE_LEN];
    out.copy_from_slice(&raw);
    Ok(out)
}

/// Encode a hex signature as `edsig`.
pub fn hexsig_to_edsig(hex_sig: &str) -> Result<String, PrimitivesError> {
    sig_to_prefixed_sig(hex_sig, true)
}

/// Encode a hex signature as `edsig` or `spsig1`.
pub fn sig_to_prefixed_sig(hex_sig: &str, is_edsig: bool) -> Result<String, PrimitivesError> {
    let raw = hex_to_bytes(hex_sig)?;
    if raw.len() != SIGNATURE_LEN {
        return Err(PrimitivesError::InvalidLength {
            expected: SIGNATURE_LEN,
            got: raw.len(),
        });
    }
    let prefix = if is_edsig {
        Prefix::Ed25519Signature
    } else {
        Prefix::Secp256k1Signature
    };
    Ok(b58c_encode(&raw, prefix))
}
