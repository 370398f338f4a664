/*
[INPUT]:  Bybit V5 API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// One account entry of the wallet-balance result.
///
/// Amounts stay as the exchange sends them (strings, sometimes empty).
/// Unknown fields land in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub total_equity: Option<String>,
    #[serde(default)]
    pub total_wallet_balance: Option<String>,
    #[serde(default)]
    pub total_available_balance: Option<String>,
    #[serde(default)]
    pub coin: Vec<CoinBalance>,
    /// Fields not modelled above, kept so the account re-serializes in full
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WalletAccount {
    pub fn coin(&self, symbol: &str) -> Option<&CoinBalance> {
        self.coin.iter().find(|entry| entry.coin == symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinBalance {
    pub coin: String,
    #[serde(default)]
    pub equity: Option<String>,
    #[serde(default)]
    pub wallet_balance: Option<String>,
    #[serde(default)]
    pub available_to_withdraw: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
