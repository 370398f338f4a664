/*
[INPUT]:  Order requests and balance queries from callers
[OUTPUT]: Exchange responses through an injectable interface
[POS]:    Exchange abstraction - seam between bot logic and transport
[UPDATE]: When the bot needs new exchange capabilities
*/

use async_trait::async_trait;

use crate::http::{BybitClient, Result};
use crate::types::{
    AccountType, ApiResponse, PlaceOrderRequest, PlaceOrderResult, ServerTime, WalletBalance,
};

/// Exchange capabilities consumed by the bot.
///
/// [`BybitClient`] is the production implementation; tests provide their own.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Fetch server time (used as a liveness check)
    async fn server_time(&self) -> Result<ApiResponse<ServerTime>>;

    /// Fetch wallet balances for an account type
    async fn wallet_balance(&self, account_type: AccountType)
    -> Result<ApiResponse<WalletBalance>>;

    /// Submit one order
    async fn place_order(&self, req: &PlaceOrderRequest) -> Result<ApiResponse<PlaceOrderResult>>;
}

#[async_trait]
impl ExchangeApi for BybitClient {
    async fn server_time(&self) -> Result<ApiResponse<ServerTime>> {
        self.get_server_time().await
    }

    async fn wallet_balance(
        &self,
        account_type: AccountType,
    ) -> Result<ApiResponse<WalletBalance>> {
        self.get_wallet_balance(account_type).await
    }

    async fn place_order(&self, req: &PlaceOrderRequest) -> Result<ApiResponse<PlaceOrderResult>> {
        BybitClient::place_order(self, req).await
    }
}
