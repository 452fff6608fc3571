//! Trades and the events rendered from them.
//!
//! [`Trade`] is emitted for each match between a buy and a sell. Each trade yields two
//! [`Execution`] events, buy-side first. [`Unexecuted`] is emitted once per order still
//! resting at shutdown.

use crate::types::{OrderId, Side, TradeId};
use rust_decimal::Decimal;

/// One match between a buy and a sell order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub price: Decimal,
    pub quantity: u64,
    pub aggressor_side: Side,
}

impl Trade {
    /// The buy-side fill followed by the sell-side fill.
    pub fn executions(&self) -> [Execution; 2] {
        [
            Execution {
                order_id: self.buy_order_id.clone(),
                quantity: self.quantity,
                price: self.price,
                role: FillRole::Bought,
            },
            Execution {
                order_id: self.sell_order_id.clone(),
                quantity: self.quantity,
                price: self.price,
                role: FillRole::Sold,
            },
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRole {
    Bought,
    Sold,
}

/// One side of a trade, as reported for a single order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Execution {
    pub order_id: OrderId,
    pub quantity: u64,
    pub price: Decimal,
    pub role: FillRole,
}

/// Order still resting when the engine shuts down.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Unexecuted {
    pub order_id: OrderId,
    pub quantity: u64,
    pub arrival_seq: u64,
}
