//! Wallet configuration.

/// Configuration for an [`OperationService`](crate::OperationService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Largest fee accepted for one operation group, in whole tez.
    pub fee_hard_cap_tez: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self { fee_hard_cap_tez: 100 }
    }
}
