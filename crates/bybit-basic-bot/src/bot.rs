/*
[INPUT]:  ExchangeApi implementation, order requests, balance queries
[OUTPUT]: Logged order placements and balance summaries
[POS]:    Bot layer - session liveness check, order submission, balance query
[UPDATE]: When adding bot operations or changing what gets logged
*/

use rust_decimal::Decimal;
use tracing::{error, info, instrument};

use bybit_basic_adapter::{
    AccountType, ApiResponse, Category, Environment, ExchangeApi, PlaceOrderResult, Side,
    WalletBalance,
};

use crate::error::{OrderError, SessionError};
use crate::order::OrderRequest;

/// Placeholder for balance fields the exchange did not return
pub const NOT_AVAILABLE: &str = "N/A";

/// Coin whose withdrawable amount is reported
const QUOTE_COIN: &str = "USDT";

/// Values extracted from a unified-account wallet balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSummary {
    pub total_equity: String,
    pub available_balance: String,
}

impl BalanceSummary {
    /// Read total equity of the first account and the USDT
    /// `availableToWithdraw`, falling back to [`NOT_AVAILABLE`].
    pub fn from_wallet(wallet: &WalletBalance) -> Self {
        let account = wallet.list.first();

        let total_equity = account
            .and_then(|account| account.total_equity.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let available_balance = account
            .and_then(|account| account.coin(QUOTE_COIN))
            .and_then(|coin| coin.available_to_withdraw.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            total_equity,
            available_balance,
        }
    }
}

/// An established exchange session.
///
/// Built once at startup by [`Bot::connect`]; every operation is a single
/// request with no retry.
#[derive(Debug)]
pub struct Bot<E> {
    exchange: E,
    environment: Environment,
    category: Category,
}

impl<E: ExchangeApi> Bot<E> {
    /// Wrap an exchange and verify it answers a server-time request
    #[instrument(name = "init", skip_all)]
    pub async fn connect(
        exchange: E,
        environment: Environment,
        category: Category,
    ) -> Result<Self, SessionError> {
        info!("initializing bot");

        match exchange.server_time().await {
            Ok(response) => {
                info!(
                    testnet = environment.is_testnet(),
                    server_time = %response.result.time_second,
                    "connection successful"
                );
                Ok(Self {
                    exchange,
                    environment,
                    category,
                })
            }
            Err(err) => {
                error!(
                    error = %err,
                    "failed to initialize client, check API keys and network connection"
                );
                Err(SessionError::LivenessCheck(err))
            }
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn exchange(&self) -> &E {
        &self.exchange
    }

    /// Fetch and log the unified-account balance. Errors are logged and returned.
    #[instrument(name = "get_balance", skip_all)]
    pub async fn get_balance(&self) -> Result<BalanceSummary, OrderError> {
        info!("fetching wallet balance");

        let response = match self.exchange.wallet_balance(AccountType::Unified).await {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "failed to fetch balance");
                return Err(err.into());
            }
        };

        let summary = BalanceSummary::from_wallet(&response.result);
        info!("account balance (unified margin)");
        info!("total equity (USDT): {}", summary.total_equity);
        info!("available balance (USDT): {}", summary.available_balance);
        info!("full response: {}", render(&response));
        Ok(summary)
    }

    /// Validate raw input and submit it. See [`OrderRequest::new`].
    pub async fn place_order(
        &self,
        symbol: &str,
        side: &str,
        kind: &str,
        quantity: Decimal,
        price: Option<Decimal>,
        trigger_price: Option<Decimal>,
    ) -> Result<ApiResponse<PlaceOrderResult>, OrderError> {
        let order = OrderRequest::new(symbol, side, kind, quantity, price, trigger_price);
        self.submit(order).await
    }

    pub async fn place_market_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
    ) -> Result<ApiResponse<PlaceOrderResult>, OrderError> {
        self.submit(OrderRequest::market(symbol, side, quantity)).await
    }

    pub async fn place_limit_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<ApiResponse<PlaceOrderResult>, OrderError> {
        self.submit(OrderRequest::limit(symbol, side, quantity, price)).await
    }

    pub async fn place_stop_limit_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        trigger_price: Decimal,
    ) -> Result<ApiResponse<PlaceOrderResult>, OrderError> {
        self.submit(OrderRequest::stop_limit(
            symbol,
            side,
            quantity,
            price,
            trigger_price,
        ))
        .await
    }

    /// Log the outcome of validation, send the order, log the result.
    ///
    /// A response without an order id is logged as an error but still
    /// returned as `Ok`.
    #[instrument(name = "place_order", skip_all)]
    async fn submit(
        &self,
        order: Result<OrderRequest, crate::order::ValidationError>,
    ) -> Result<ApiResponse<PlaceOrderResult>, OrderError> {
        let order = match order {
            Ok(order) => order,
            Err(err) => {
                error!(error = %err, "order rejected before sending");
                return Err(err.into());
            }
        };

        let params = order.to_wire(self.category);
        let label = order.label();
        info!(
            "sending API request for {} order: {}",
            label,
            render(&params)
        );

        let response = match self.exchange.place_order(&params).await {
            Ok(response) => response,
            Err(err) => {
                let err = OrderError::from(err);
                match &err {
                    OrderError::InvalidRequest(source) => error!(
                        error = %source,
                        "API error (invalid request), check symbol, qty and price precision"
                    ),
                    OrderError::AuthOrRateLimit(source) => error!(
                        error = %source,
                        "API error (failed request), authentication or rate limit issue"
                    ),
                    OrderError::Unexpected(source) => {
                        error!(error = %source, "an unexpected error occurred")
                    }
                    OrderError::Validation(_) => {}
                }
                return Err(err);
            }
        };

        match response.result.order_id() {
            Some(order_id) => {
                info!(order_id, "order placed");
                let price = order
                    .price
                    .map(|price| price.normalize().to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                info!(
                    "details: {} {} {} @ {} (price: {})",
                    order.side,
                    order.quantity.normalize(),
                    order.symbol,
                    label,
                    price
                );
                info!("full response: {}", render(&response));
            }
            None => {
                error!(
                    "order failed, no order id in response: {}",
                    render(&response)
                );
            }
        }

        Ok(response)
    }
}

fn render<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| format!("<unserializable: {err}>"))
}
