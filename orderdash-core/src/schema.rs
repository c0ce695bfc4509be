//! Row types for the four CSV files written by the matching engine.
//!
//! Column names match the engine's headers exactly. Only the columns the
//! dashboard reads are required; identifiers and fill counters default to
//! zero when a file omits them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One executed trade from `trades.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRow {
    #[serde(rename = "TradeID", default)]
    pub trade_id: u64,
    #[serde(rename = "BuyOrderID", default)]
    pub buy_order_id: u64,
    #[serde(rename = "SellOrderID", default)]
    pub sell_order_id: u64,
    #[serde(rename = "Price")]
    pub price: i64,
    #[serde(rename = "Quantity")]
    pub quantity: u64,
    /// Unix epoch seconds.
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
}

/// One resting order from `buy_orders.csv` or `sell_orders.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    #[serde(rename = "OrderID", default)]
    pub order_id: u64,
    #[serde(rename = "Price")]
    pub price: i64,
    #[serde(rename = "Quantity")]
    pub quantity: u64,
    #[serde(rename = "FilledQuantity", default)]
    pub filled_quantity: u64,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: i64,
}

impl OrderRow {
    /// Quantity still open on the book.
    pub fn remaining(&self) -> u64 {
        self.quantity.saturating_sub(self.filled_quantity)
    }
}

/// One line of `order_status.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    #[serde(rename = "OrderID", default)]
    pub order_id: u64,
    #[serde(rename = "Status")]
    pub status: OrderStatus,
    #[serde(rename = "FilledQuantity", default)]
    pub filled_quantity: u64,
    #[serde(rename = "TotalQuantity", default)]
    pub total_quantity: u64,
}

/// Side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

/// Order lifecycle state as reported by the engine.
///
/// Unknown labels are kept verbatim so they still show up in the
/// distribution instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Open,
    Partial,
    Filled,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "OPEN" => OrderStatus::Open,
            "PARTIAL" => OrderStatus::Partial,
            "FILLED" => OrderStatus::Filled,
            "CANCELLED" | "CANCELED" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Partial => "PARTIAL",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        OrderStatus::parse(&raw)
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.label().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
