/*
[INPUT]:  User-supplied symbol, side, order kind, quantity and prices
[OUTPUT]: Validated OrderRequest and its wire-level PlaceOrderRequest
[POS]:    Order layer - validation and exchange parameter mapping
[UPDATE]: When adding order kinds or changing conditional-order encoding
*/

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use bybit_basic_adapter::{
    Category, OrderType, PlaceOrderRequest, Side, StopOrderType, TimeInForce, TriggerDirection,
};

/// Order kinds the CLI can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    Market,
    Limit,
    StopLimit,
}

impl OrderKind {
    pub fn requires_price(self) -> bool {
        matches!(self, OrderKind::Limit | OrderKind::StopLimit)
    }

    pub fn requires_trigger(self) -> bool {
        self == OrderKind::StopLimit
    }

    /// Exchange order type. Stop-limit orders are placed as `Limit` with
    /// trigger fields attached.
    pub fn wire_type(self) -> OrderType {
        match self {
            OrderKind::Market => OrderType::Market,
            OrderKind::Limit | OrderKind::StopLimit => OrderType::Limit,
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            OrderKind::Market => "MARKET",
            OrderKind::Limit => "LIMIT",
            OrderKind::StopLimit => "STOP_LIMIT",
        };
        f.write_str(value)
    }
}

impl FromStr for OrderKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderKind::Market),
            "LIMIT" => Ok(OrderKind::Limit),
            "STOP_LIMIT" => Ok(OrderKind::StopLimit),
            _ => Err(ValidationError::InvalidKind(s.to_string())),
        }
    }
}

/// Parse a user-entered side (`buy`, `SELL`, ...)
pub fn parse_side(input: &str) -> Result<Side, ValidationError> {
    match input.trim().to_ascii_uppercase().as_str() {
        "BUY" => Ok(Side::Buy),
        "SELL" => Ok(Side::Sell),
        _ => Err(ValidationError::InvalidSide(input.to_string())),
    }
}

/// Reasons an order is rejected before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid side '{0}', expected BUY or SELL")]
    InvalidSide(String),

    #[error("invalid order type '{0}', expected MARKET, LIMIT or STOP_LIMIT")]
    InvalidKind(String),

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("quantity must be positive")]
    NonPositiveQuantity,

    #[error("{0} order requires a valid positive price")]
    MissingPrice(OrderKind),

    #[error("STOP_LIMIT order requires a valid positive trigger price")]
    MissingTriggerPrice,
}

/// A validated order, ready to be encoded for the exchange
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub trigger_price: Option<Decimal>,
}

impl OrderRequest {
    /// Validate raw user input.
    ///
    /// Side and kind are checked first, then the price fields the kind
    /// requires, then the quantity.
    pub fn new(
        symbol: &str,
        side: &str,
        kind: &str,
        quantity: Decimal,
        price: Option<Decimal>,
        trigger_price: Option<Decimal>,
    ) -> Result<Self, ValidationError> {
        let side = parse_side(side)?;
        let kind = kind.parse::<OrderKind>()?;
        Self::validated(symbol, side, kind, quantity, price, trigger_price)
    }

    pub fn market(symbol: &str, side: Side, quantity: Decimal) -> Result<Self, ValidationError> {
        Self::validated(symbol, side, OrderKind::Market, quantity, None, None)
    }

    pub fn limit(
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<Self, ValidationError> {
        Self::validated(symbol, side, OrderKind::Limit, quantity, Some(price), None)
    }

    pub fn stop_limit(
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        trigger_price: Decimal,
    ) -> Result<Self, ValidationError> {
        Self::validated(
            symbol,
            side,
            OrderKind::StopLimit,
            quantity,
            Some(price),
            Some(trigger_price),
        )
    }

    fn validated(
        symbol: &str,
        side: Side,
        kind: OrderKind,
        quantity: Decimal,
        price: Option<Decimal>,
        trigger_price: Option<Decimal>,
    ) -> Result<Self, ValidationError> {
        if kind.requires_price() && !is_positive(price) {
            return Err(ValidationError::MissingPrice(kind));
        }
        if kind.requires_trigger() && !is_positive(trigger_price) {
            return Err(ValidationError::MissingTriggerPrice);
        }
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity);
        }

        let symbol = symbol.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        Ok(Self {
            symbol,
            side,
            kind,
            quantity,
            // market orders never carry a price or trigger on the wire
            price: price.filter(|_| kind.requires_price()),
            trigger_price: trigger_price.filter(|_| kind.requires_trigger()),
        })
    }

    /// Encode as `POST /v5/order/create` parameters
    pub fn to_wire(&self, category: Category) -> PlaceOrderRequest {
        let conditional = self.kind.requires_trigger();
        PlaceOrderRequest {
            category,
            symbol: self.symbol.clone(),
            side: self.side,
            order_type: self.kind.wire_type(),
            qty: self.quantity.normalize(),
            time_in_force: TimeInForce::Gtc,
            price: self.price.map(|price| price.normalize()),
            stop_order_type: conditional.then_some(StopOrderType::Stop),
            trigger_price: self.trigger_price.map(|price| price.normalize()),
            trigger_direction: conditional.then(|| TriggerDirection::for_side(self.side)),
        }
    }

    /// Short label used in log lines, e.g. `STOP_LIMIT (Trigger: 105)`
    pub fn label(&self) -> String {
        match (self.kind, self.trigger_price) {
            (OrderKind::StopLimit, Some(trigger)) => {
                format!("STOP_LIMIT (Trigger: {})", trigger.normalize())
            }
            _ => self.kind.to_string(),
        }
    }
}

fn is_positive(value: Option<Decimal>) -> bool {
    value.is_some_and(|v| v > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("decimal")
    }

    #[test]
    fn market_order_maps_to_wire_fields() {
        let order = OrderRequest::new("btcusdt", "buy", "MARKET", dec("10"), None, None)
            .expect("market order should validate");
        let wire = serde_json::to_value(order.to_wire(Category::Linear)).unwrap();

        assert_eq!(
            wire,
            json!({
                "category": "linear",
                "symbol": "BTCUSDT",
                "side": "Buy",
                "orderType": "Market",
                "qty": "10",
                "timeInForce": "GTC"
            })
        );
    }

    #[test]
    fn market_order_drops_stray_prices() {
        let order = OrderRequest::new(
            "ETHUSDT",
            "SELL",
            "market",
            dec("1"),
            Some(dec("5")),
            Some(dec("6")),
        )
        .unwrap();
        let wire = order.to_wire(Category::Linear);
        assert_eq!(wire.price, None);
        assert_eq!(wire.trigger_price, None);
        assert_eq!(wire.trigger_direction, None);
    }

    #[test]
    fn limit_order_carries_price() {
        let order =
            OrderRequest::limit("ethusdt", Side::Sell, dec("0.50"), dec("2500.00")).unwrap();
        let wire = serde_json::to_value(order.to_wire(Category::Linear)).unwrap();

        assert_eq!(wire["orderType"], "Limit");
        assert_eq!(wire["side"], "Sell");
        assert_eq!(wire["qty"], "0.5");
        assert_eq!(wire["price"], "2500");
        assert_eq!(wire["timeInForce"], "GTC");
        assert!(wire.get("stopOrderType").is_none());
        assert!(wire.get("triggerDirection").is_none());
    }

    #[test]
    fn stop_limit_sell_encodes_conditional_fields() {
        let order = OrderRequest::new(
            "BTCUSDT",
            "SELL",
            "STOP_LIMIT",
            dec("1"),
            Some(dec("100")),
            Some(dec("105")),
        )
        .expect("stop-limit should validate");
        let wire = serde_json::to_value(order.to_wire(Category::Linear)).unwrap();

        assert_eq!(wire["orderType"], "Limit");
        assert_eq!(wire["stopOrderType"], "Stop");
        assert_eq!(wire["triggerPrice"], "105");
        assert_eq!(wire["triggerDirection"], 2);
        assert_eq!(wire["price"], "100");
        assert_eq!(order.label(), "STOP_LIMIT (Trigger: 105)");
    }

    #[test]
    fn stop_limit_buy_triggers_above() {
        let order = OrderRequest::stop_limit("BTCUSDT", Side::Buy, dec("1"), dec("100"), dec("95"))
            .unwrap();
        let wire = order.to_wire(Category::Linear);
        assert_eq!(wire.trigger_direction, Some(TriggerDirection::RisesAbove));
        assert_eq!(wire.order_type, OrderType::Limit);
    }

    #[rstest]
    #[case("LIMIT", None)]
    #[case("LIMIT", Some("0"))]
    #[case("LIMIT", Some("-1"))]
    #[case("STOP_LIMIT", None)]
    #[case("STOP_LIMIT", Some("0"))]
    fn price_required(#[case] kind: &str, #[case] price: Option<&str>) {
        let err = OrderRequest::new(
            "BTCUSDT",
            "BUY",
            kind,
            dec("1"),
            price.map(dec),
            Some(dec("10")),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::MissingPrice(_)));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("0"))]
    #[case(Some("-5"))]
    fn stop_limit_requires_trigger(#[case] trigger: Option<&str>) {
        let err = OrderRequest::new(
            "BTCUSDT",
            "BUY",
            "STOP_LIMIT",
            dec("1"),
            Some(dec("100")),
            trigger.map(dec),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingTriggerPrice);
    }

    #[rstest]
    #[case("HOLD", "MARKET")]
    #[case("", "LIMIT")]
    #[case("BUY", "STOP_MARKET")]
    #[case("SELL", "")]
    fn bad_side_or_kind_rejected(#[case] side: &str, #[case] kind: &str) {
        let err = OrderRequest::new("BTCUSDT", side, kind, dec("1"), Some(dec("1")), Some(dec("1")))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidSide(_) | ValidationError::InvalidKind(_)
        ));
    }

    #[test]
    fn side_checked_before_kind() {
        let err = OrderRequest::new("BTCUSDT", "up", "nope", dec("1"), None, None).unwrap_err();
        assert_eq!(err, ValidationError::InvalidSide("up".to_string()));
    }

    #[test]
    fn quantity_and_symbol_checked() {
        assert_eq!(
            OrderRequest::market("BTCUSDT", Side::Buy, Decimal::ZERO).unwrap_err(),
            ValidationError::NonPositiveQuantity
        );
        assert_eq!(
            OrderRequest::market("   ", Side::Buy, dec("1")).unwrap_err(),
            ValidationError::EmptySymbol
        );
    }

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!("stop_limit".parse::<OrderKind>().unwrap(), OrderKind::StopLimit);
        assert_eq!(" Market ".parse::<OrderKind>().unwrap(), OrderKind::Market);
        assert_eq!(parse_side(" sell").unwrap(), Side::Sell);
    }
}
