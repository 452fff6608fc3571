//! Single-instrument order book: bids and asks, indexed by priority.
//!
//! Supports add, best lookup and filling the best order (used by [`crate::matching`]).
//! Each side keeps a FIFO queue of market orders ahead of its price levels; each
//! price level is FIFO. Best bid is the highest price, best ask the lowest.

use crate::error::EngineError;
use crate::types::{Order, OrderId, OrderType, Side};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, VecDeque};

/// Price level -> FIFO queue of orders (arrival order).
type PriceLevels = BTreeMap<Decimal, VecDeque<Order>>;

/// Result of filling the best resting order on one side.
#[derive(Clone, Debug, PartialEq)]
pub struct Fill {
    pub resting_order_id: OrderId,
    pub quantity: u64,
    /// Quantity left on the resting order after this fill.
    pub remaining: u64,
    /// True if the resting order was fully filled (removed from book).
    pub resting_fully_filled: bool,
}

#[derive(Debug, Default)]
struct BookSide {
    market: VecDeque<Order>,
    levels: PriceLevels,
    len: usize,
}

impl BookSide {
    fn best_level_price(&self, side: Side) -> Option<Decimal> {
        match side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    fn best(&self, side: Side) -> Option<&Order> {
        if let Some(order) = self.market.front() {
            return Some(order);
        }
        let price = self.best_level_price(side)?;
        self.levels.get(&price).and_then(|queue| queue.front())
    }

    fn push(&mut self, order: Order) -> Result<(), EngineError> {
        match (order.order_type, order.price) {
            (OrderType::Market, _) => self.market.push_back(order),
            (OrderType::Limit, Some(price)) => self.levels.entry(price).or_default().push_back(order),
            (OrderType::Limit, None) => {
                return Err(EngineError::invalid_order(&order.order_id, "limit order must have price"))
            }
        }
        self.len += 1;
        Ok(())
    }

    fn fill_best(&mut self, side: Side, quantity: u64) -> Option<Fill> {
        if let Some(front) = self.market.front_mut() {
            let fill = apply_fill(front, quantity);
            if fill.resting_fully_filled {
                self.market.pop_front();
                self.len -= 1;
            }
            return Some(fill);
        }
        let price = self.best_level_price(side)?;
        let queue = self.levels.get_mut(&price)?;
        let fill = apply_fill(queue.front_mut()?, quantity);
        if fill.resting_fully_filled {
            queue.pop_front();
            self.len -= 1;
            if queue.is_empty() {
                self.levels.remove(&price);
            }
        }
        Some(fill)
    }

    fn orders(&self) -> Vec<&Order> {
        let mut out: Vec<&Order> = self
            .market
            .iter()
            .chain(self.levels.values().flatten())
            .collect();
        out.sort_by_key(|o| o.arrival_seq);
        out
    }

    fn into_orders(self) -> impl Iterator<Item = Order> {
        self.market
            .into_iter()
            .chain(self.levels.into_values().flatten())
    }
}

fn apply_fill(order: &mut Order, quantity: u64) -> Fill {
    let filled = quantity.min(order.quantity);
    order.quantity -= filled;
    Fill {
        resting_order_id: order.order_id.clone(),
        quantity: filled,
        remaining: order.quantity,
        resting_fully_filled: order.quantity == 0,
    }
}

/// Single-instrument order book.
#[derive(Debug, Default)]
pub struct OrderBook {
    bids: BookSide,
    asks: BookSide,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Rest an order on its own side. Does not run matching; caller uses matching module.
    pub fn add_order(&mut self, order: Order) -> Result<(), EngineError> {
        if order.quantity == 0 {
            return Err(EngineError::invalid_order(&order.order_id, "cannot rest an order with zero quantity"));
        }
        let side = order.side;
        self.side_mut(side).push(order)
    }

    /// Highest-priority resting order on `side`.
    pub fn best(&self, side: Side) -> Option<&Order> {
        self.side(side).best(side)
    }

    /// Fill up to `quantity` against the best order on `side`, removing it once exhausted.
    /// Returns `None` if the side is empty.
    pub fn fill_best(&mut self, side: Side, quantity: u64) -> Option<Fill> {
        self.side_mut(side).fill_best(side, quantity)
    }

    /// Resting orders on `side` in arrival order (not priority order).
    pub fn orders(&self, side: Side) -> Vec<&Order> {
        self.side(side).orders()
    }

    pub fn len(&self, side: Side) -> usize {
        self.side(side).len
    }

    pub fn is_empty(&self) -> bool {
        self.bids.len == 0 && self.asks.len == 0
    }

    /// Best limit bid price (None if no limit bids).
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.best_level_price(Side::Buy)
    }

    /// Best limit ask price (None if no limit asks).
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.best_level_price(Side::Sell)
    }

    /// Consumes the book, yielding every resting order from both sides (unspecified order).
    pub fn into_orders(self) -> Vec<Order> {
        self.bids.into_orders().chain(self.asks.into_orders()).collect()
    }
}
