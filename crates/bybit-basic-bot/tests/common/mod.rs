/*
[INPUT]:  Canned exchange responses
[OUTPUT]: In-process exchange double and response fixtures
[POS]:    Test infrastructure - shared across bot test modules
[UPDATE]: When ExchangeApi gains methods or fixtures change
*/

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bybit_basic_adapter::{
    AccountType, ApiResponse, BybitError, CoinBalance, ExchangeApi, PlaceOrderRequest,
    PlaceOrderResult, Result, ServerTime, WalletAccount, WalletBalance,
};

type Reply<T> = Box<dyn Fn() -> Result<ApiResponse<T>> + Send + Sync>;

/// Exchange double that records every call it receives
pub struct MockExchange {
    server_time: Reply<ServerTime>,
    wallet: Reply<WalletBalance>,
    order: Reply<PlaceOrderResult>,
    time_calls: AtomicUsize,
    wallet_calls: AtomicUsize,
    sent_orders: Mutex<Vec<PlaceOrderRequest>>,
}

impl std::fmt::Debug for MockExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockExchange")
            .field("time_calls", &self.time_calls)
            .field("wallet_calls", &self.wallet_calls)
            .field("sent_orders", &self.sent_orders)
            .finish_non_exhaustive()
    }
}

impl Default for MockExchange {
    fn default() -> Self {
        Self {
            server_time: Box::new(|| Ok(ok(server_time()))),
            wallet: Box::new(|| Ok(ok(wallet(Some("1000"), &[("USDT", "750.25")])))),
            order: Box::new(|| Ok(ok(order_result("order-1")))),
            time_calls: AtomicUsize::new(0),
            wallet_calls: AtomicUsize::new(0),
            sent_orders: Mutex::new(Vec::new()),
        }
    }
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server_time(
        mut self,
        reply: impl Fn() -> Result<ApiResponse<ServerTime>> + Send + Sync + 'static,
    ) -> Self {
        self.server_time = Box::new(reply);
        self
    }

    pub fn with_wallet(
        mut self,
        reply: impl Fn() -> Result<ApiResponse<WalletBalance>> + Send + Sync + 'static,
    ) -> Self {
        self.wallet = Box::new(reply);
        self
    }

    pub fn with_order(
        mut self,
        reply: impl Fn() -> Result<ApiResponse<PlaceOrderResult>> + Send + Sync + 'static,
    ) -> Self {
        self.order = Box::new(reply);
        self
    }

    pub fn time_calls(&self) -> usize {
        self.time_calls.load(Ordering::SeqCst)
    }

    pub fn wallet_calls(&self) -> usize {
        self.wallet_calls.load(Ordering::SeqCst)
    }

    pub fn sent_orders(&self) -> Vec<PlaceOrderRequest> {
        self.sent_orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangeApi for MockExchange {
    async fn server_time(&self) -> Result<ApiResponse<ServerTime>> {
        self.time_calls.fetch_add(1, Ordering::SeqCst);
        (self.server_time)()
    }

    async fn wallet_balance(
        &self,
        account_type: AccountType,
    ) -> Result<ApiResponse<WalletBalance>> {
        assert_eq!(account_type, AccountType::Unified);
        self.wallet_calls.fetch_add(1, Ordering::SeqCst);
        (self.wallet)()
    }

    async fn place_order(&self, req: &PlaceOrderRequest) -> Result<ApiResponse<PlaceOrderResult>> {
        self.sent_orders.lock().unwrap().push(req.clone());
        (self.order)()
    }
}

pub fn ok<T>(result: T) -> ApiResponse<T> {
    ApiResponse {
        ret_code: 0,
        ret_msg: "OK".to_string(),
        result,
        ret_ext_info: serde_json::json!({}),
        time: Some(1_700_000_000_000),
    }
}

pub fn api_error(code: i64, message: &str) -> BybitError {
    BybitError::Api {
        code,
        message: message.to_string(),
    }
}

pub fn server_time() -> ServerTime {
    ServerTime {
        time_second: "1700000000".to_string(),
        time_nano: "1700000000000000000".to_string(),
    }
}

pub fn order_result(order_id: &str) -> PlaceOrderResult {
    PlaceOrderResult {
        order_id: Some(order_id.to_string()),
        order_link_id: Some(String::new()),
        ..PlaceOrderResult::default()
    }
}

/// Unified wallet with one account holding the given `(coin, availableToWithdraw)` pairs
pub fn wallet(total_equity: Option<&str>, coins: &[(&str, &str)]) -> WalletBalance {
    WalletBalance {
        list: vec![WalletAccount {
            account_type: Some("UNIFIED".to_string()),
            total_equity: total_equity.map(str::to_string),
            coin: coins
                .iter()
                .map(|(coin, available)| CoinBalance {
                    coin: coin.to_string(),
                    available_to_withdraw: Some(available.to_string()),
                    ..CoinBalance::default()
                })
                .collect(),
            ..WalletAccount::default()
        }],
    }
}

/// Wrap a result payload in the V5 response envelope
pub fn envelope(result: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": result,
        "retExtInfo": {},
        "time": 1_700_000_000_000i64,
    })
}

/// Fresh directory under the system temp dir
pub fn scratch_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("bybit-basic-bot-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
