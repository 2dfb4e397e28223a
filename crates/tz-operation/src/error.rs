/// Error types for operation building and forging.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The requested fee exceeds the configured hard cap.
    #[error("fee of {fee_mutez} mutez exceeds the cap of {cap_mutez} mutez")]
    FeeTooHigh { fee_mutez: u64, cap_mutez: u64 },

    /// The amount cannot be expressed in whole minor units.
    #[error("the amount {amount} is not within {decimals} decimals")]
    FractionalAmount { amount: String, decimals: u32 },

    /// A decimal amount string could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The operation shape is not supported for this source.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An address is not a valid implicit or originated account.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A Micheline primitive name or tag is not in the opcode table.
    #[error("unknown Michelson primitive: {0}")]
    UnknownPrimitive(String),

    /// Binary encoding or decoding failed.
    #[error("forge error: {0}")]
    Forge(String),

    /// The node's forged bytes differ from the local encoding.
    #[error("forged bytes do not match the local encoding")]
    ValidationError { remote: String, local: String },

    /// An underlying primitives error (forwarded from `tz-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] tz_primitives::PrimitivesError),

    /// JSON conversion failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
