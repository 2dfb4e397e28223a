//! Token assets and their resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Token contract standard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStandard {
    #[serde(rename = "FA1.2")]
    Fa12,
    #[serde(rename = "FA2")]
    Fa2,
}

/// A token as needed to build a transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub standard: TokenStandard,
    /// Decimal places of the display unit.
    pub decimals: u32,
    /// The token's contract (`KT1…`).
    pub contract_address: String,
    /// Token id within an FA2 contract; `0` for FA1.2.
    pub token_id: String,
}

/// Resolves a token ticker to its asset description.
pub trait AssetResolver: Send + Sync {
    /// Look up `ticker`, returning `None` if it is unknown.
    fn resolve_asset(&self, ticker: &str) -> Option<Asset>;
}

/// An in-memory ticker table.
#[derive(Clone, Debug, Default)]
pub struct StaticAssets {
    assets: HashMap<String, Asset>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `asset` under `ticker`, replacing any previous entry.
    pub fn with(mut self, ticker: &str, asset: Asset) -> Self {
        self.assets.insert(ticker.to_string(), asset);
        self
    }
}

impl AssetResolver for StaticAssets {
    fn resolve_asset(&self, ticker: &str) -> Option<Asset> {
        self.assets.get(ticker).cloned()
    }
}
