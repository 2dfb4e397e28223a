/// Unified error type for all primitives operations.
///
/// Covers errors from Base58Check decoding, hex conversion, key parsing,
/// watermarked signing and binary reading.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("prefix mismatch: expected {expected}")]
    PrefixMismatch { expected: &'static str },

    #[error("invalid payload length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid watermark: {0:#04x}")]
    InvalidWatermark(u8),

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("null seed")]
    NullSeed,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("{0}")]
    Other(String),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}

impl From<k256::ecdsa::Error> for PrimitivesError {
    fn from(e: k256::ecdsa::Error) -> Self {
        PrimitivesError::InvalidSecretKey(e.to_string())
    }
}
