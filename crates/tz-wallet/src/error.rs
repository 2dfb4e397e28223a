use tz_operation::OperationError;
use tz_primitives::PrimitivesError;
use tz_rpc::RpcError;

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("operation error: {0}")]
    Operation(#[from] OperationError),
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
    #[error("unknown asset: {0}")]
    UnknownAsset(String),
    #[error("not a tz2 address: {0}")]
    InvalidTorusAddress(String),
    #[error("public key {0} does not belong to the account")]
    InvalidPublicKey(String),
    #[error("signature does not verify")]
    InvalidSignature,
    #[error("operation {hash} not found at level {level}")]
    OperationNotFound { level: u64, hash: String },
    #[error("invalid signed bytes: {0}")]
    InvalidSignedBytes(String),
    #[error("injection did not return an operation hash: {0}")]
    InjectionFailed(String),
    #[error("key lookup failed: {0}")]
    KeyLookup(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WalletError {
    /// Stable taxonomy code of the error.
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::Operation(err) => match err {
                OperationError::FeeTooHigh { .. } => "TooHighFee",
                OperationError::FractionalAmount { .. } => "FractionalAmountError",
                OperationError::InvalidAmount(_) => "InvalidAmount",
                OperationError::UnsupportedOperation(_) => "UnsupportedOperation",
                OperationError::InvalidAddress(_) => "InvalidAddress",
                OperationError::ValidationError { .. } => "ValidationError",
                OperationError::UnknownPrimitive(_) | OperationError::Forge(_) => "ForgeError",
                OperationError::Primitives(err) => primitives_code(err),
                OperationError::Json(_) => "SerializationError",
            },
            WalletError::Rpc(err) => match err {
                RpcError::Transport { .. } | RpcError::NoEndpoints => "TransportError",
                RpcError::Rejected { .. } => "ProtocolRejection",
                RpcError::Timeout(_) => "InjectionTimeout",
                RpcError::OperationFailed(_) => "OperationFailure",
                RpcError::UncaughtApplied => "UncaughtAppliedFailure",
                RpcError::Serialization(_) | RpcError::InvalidResponse(_) => "InvalidResponse",
            },
            WalletError::Primitives(err) => primitives_code(err),
            WalletError::UnknownAsset(_) => "UnknownAsset",
            WalletError::InvalidTorusAddress(_) => "InvalidTorusAddress",
            WalletError::InvalidPublicKey(_) => "InvalidPublicKey",
            WalletError::InvalidSignature => "InvalidSignature",
            WalletError::OperationNotFound { .. } => "OperationNotFound",
            WalletError::InvalidSignedBytes(_) => "InvalidSignedBytes",
            WalletError::InjectionFailed(_) => "InjectionFailed",
            WalletError::KeyLookup(_) => "KeyLookupError",
            WalletError::Json(_) => "SerializationError",
        }
    }
}

fn primitives_code(err: &PrimitivesError) -> &'static str {
    match err {
        PrimitivesError::InvalidMnemonic(_) => "InvalidMnemonic",
        PrimitivesError::NullSeed => "NullSeed",
        PrimitivesError::InvalidSignature(_) => "InvalidSignature",
        PrimitivesError::InvalidPublicKey(_) => "InvalidPublicKey",
        PrimitivesError::InvalidSecretKey(_) => "InvalidPrivateKey",
        PrimitivesError::InvalidWatermark(_) => "InvalidWatermark",
        PrimitivesError::InvalidAddress(_) => "InvalidAddress",
        _ => "DecodeError",
    }
}
