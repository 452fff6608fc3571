//! Core types for the auction engine.
//!
//! [`OrderRequest`] is the parsed record a caller hands to the engine. Once
//! submitted it becomes an [`Order`], owned by the engine and stamped with an
//! arrival sequence number. [`Order::priority_cmp`] defines which resting order
//! on a side is matched next.

use crate::error::EngineError;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;

/// Caller-supplied order identifier. Opaque to the engine; uniqueness is not enforced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        OrderId(s.to_string())
    }
}

/// Trade identifier, numbered from 1 per engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TradeId(pub u64);

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type: limit (with price) or market (no usable price).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

/// Parsed order record, as produced by the input layer.
///
/// For limit orders, `price` must be `Some(...)`. For market orders any price is ignored.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderRequest {
    pub order_id: OrderId,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: u64,
    pub price: Option<Decimal>,
}

impl OrderRequest {
    pub fn limit(order_id: impl Into<String>, side: Side, quantity: u64, price: Decimal) -> Self {
        Self {
            order_id: OrderId(order_id.into()),
            side,
            order_type: OrderType::Limit,
            quantity,
            price: Some(price),
        }
    }

    pub fn market(order_id: impl Into<String>, side: Side, quantity: u64) -> Self {
        Self {
            order_id: OrderId(order_id.into()),
            side,
            order_type: OrderType::Market,
            quantity,
            price: None,
        }
    }

    /// Rejects records that must never reach the book: zero quantity, or a limit order without a price.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.quantity == 0 {
            return Err(EngineError::invalid_order(&self.order_id, "quantity must be positive"));
        }
        if matches!(self.order_type, OrderType::Limit) && self.price.is_none() {
            return Err(EngineError::invalid_order(&self.order_id, "limit order must have price"));
        }
        Ok(())
    }
}

/// An order owned by the engine. `quantity` is the remaining (unfilled) quantity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: u64,
    pub price: Option<Decimal>,
    pub arrival_seq: u64,
}

impl Order {
    pub(crate) fn from_request(request: OrderRequest, arrival_seq: u64) -> Self {
        let price = match request.order_type {
            OrderType::Limit => request.price,
            OrderType::Market => None,
        };
        Self {
            order_id: request.order_id,
            side: request.side,
            order_type: request.order_type,
            quantity: request.quantity,
            price,
            arrival_seq,
        }
    }

    pub fn is_limit(&self) -> bool {
        matches!(self.order_type, OrderType::Limit)
    }

    pub fn is_market(&self) -> bool {
        matches!(self.order_type, OrderType::Market)
    }

    /// Limit price, or `None` for market orders.
    pub fn limit_price(&self) -> Option<Decimal> {
        match self.order_type {
            OrderType::Limit => self.price,
            OrderType::Market => None,
        }
    }

    /// Same-side priority. `Less` means `self` is matched before `other`.
    ///
    /// Market orders come first; limit bids rank by descending price, limit asks by
    /// ascending price; remaining ties go to the earlier arrival.
    pub fn priority_cmp(&self, other: &Order) -> Ordering {
        let by_type = match (self.is_market(), other.is_market()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        };
        by_type
            .then_with(|| match (self.limit_price(), other.limit_price()) {
                (Some(a), Some(b)) => match self.side {
                    Side::Buy => b.cmp(&a),
                    Side::Sell => a.cmp(&b),
                },
                _ => Ordering::Equal,
            })
            .then_with(|| self.arrival_seq.cmp(&other.arrival_seq))
    }
}
