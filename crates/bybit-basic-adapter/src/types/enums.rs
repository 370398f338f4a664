/*
[INPUT]:  Bybit V5 API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("Buy"),
            Side::Sell => f.write_str("Sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => f.write_str("Market"),
            OrderType::Limit => f.write_str("Limit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    Gtc,
}

/// Conditional order marker sent alongside a trigger price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopOrderType {
    Stop,
}

/// Direction the market must move to fire a conditional order.
///
/// Encoded on the wire as an integer: `1` = rises to the trigger price,
/// `2` = falls to the trigger price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDirection {
    RisesAbove,
    FallsBelow,
}

impl TriggerDirection {
    /// Buy stops fire on the way up, sell stops on the way down
    pub fn for_side(side: Side) -> Self {
        match side {
            Side::Buy => TriggerDirection::RisesAbove,
            Side::Sell => TriggerDirection::FallsBelow,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            TriggerDirection::RisesAbove => 1,
            TriggerDirection::FallsBelow => 2,
        }
    }
}

impl Serialize for TriggerDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for TriggerDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(TriggerDirection::RisesAbove),
            2 => Ok(TriggerDirection::FallsBelow),
            other => Err(serde::de::Error::custom(format!(
                "invalid trigger direction {other}"
            ))),
        }
    }
}

/// Product line an order is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// USDT / USDC perpetuals and futures
    #[default]
    Linear,
    Inverse,
    Spot,
    Option,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Category::Linear => "linear",
            Category::Inverse => "inverse",
            Category::Spot => "spot",
            Category::Option => "option",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Unified,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Unified => "UNIFIED",
        }
    }
}
