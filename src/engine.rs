//! Single-entry matching engine facade.
//!
//! Holds the order book, the last traded price and the arrival/trade counters so the
//! input and report layers can submit orders without managing `OrderBook` and
//! `match_order` directly.

use crate::error::EngineError;
use crate::execution::{Trade, Unexecuted};
use crate::matching::match_order;
use crate::order_book::OrderBook;
use crate::types::{Order, OrderRequest, Side};
use log::{debug, info};
use rust_decimal::Decimal;

/// Read-only view of the book: last traded price and both sides in arrival order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BookSnapshot {
    pub last_traded_price: Decimal,
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
}

/// Single-instrument continuous double-auction engine.
///
/// Use [`Engine::submit_order`] to send orders; the engine runs matching and returns
/// the trades it generated. [`Engine::shutdown`] consumes the engine and reports every
/// order still resting.
#[derive(Debug)]
pub struct Engine {
    book: OrderBook,
    last_traded_price: Decimal,
    next_arrival_seq: u64,
    next_trade_id: u64,
}

impl Engine {
    /// Creates an engine. `initial_reference_price` is the price used when two market
    /// orders trade before any other trade has happened.
    pub fn new(initial_reference_price: Decimal) -> Self {
        Self {
            book: OrderBook::new(),
            last_traded_price: initial_reference_price,
            next_arrival_seq: 0,
            next_trade_id: 1,
        }
    }

    /// Submits an order: assigns its arrival sequence, runs matching, rests any remainder.
    ///
    /// Returns `Err` for zero quantity or a limit order without price; rejected orders
    /// consume no arrival sequence number.
    pub fn submit_order(&mut self, request: OrderRequest) -> Result<Vec<Trade>, EngineError> {
        info!(
            "order submitted order_id={} side={:?} type={:?} quantity={} price={:?}",
            request.order_id, request.side, request.order_type, request.quantity, request.price
        );
        request.validate()?;
        let arrival_seq = self.next_arrival_seq;
        self.next_arrival_seq += 1;
        let order = Order::from_request(request, arrival_seq);
        let order_id = order.order_id.clone();

        let outcome = match_order(
            &mut self.book,
            order,
            &mut self.last_traded_price,
            self.next_trade_id,
        )?;
        for trade in &outcome.trades {
            info!(
                "trade trade_id={} buy_order={} sell_order={} price={} quantity={}",
                trade.trade_id.0, trade.buy_order_id, trade.sell_order_id, trade.price, trade.quantity
            );
        }
        if outcome.rested_quantity > 0 {
            debug!(
                "order resting order_id={} arrival_seq={} remaining={}",
                order_id, arrival_seq, outcome.rested_quantity
            );
        }
        self.next_trade_id += outcome.trades.len() as u64;
        Ok(outcome.trades)
    }

    /// Current book contents in arrival order plus the last traded price. No side effects.
    pub fn book_snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            last_traded_price: self.last_traded_price,
            bids: self.book.orders(Side::Buy).into_iter().cloned().collect(),
            asks: self.book.orders(Side::Sell).into_iter().cloned().collect(),
        }
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn last_traded_price(&self) -> Decimal {
        self.last_traded_price
    }

    /// Best limit bid price, if any.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.book.best_bid()
    }

    /// Best limit ask price, if any.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.book.best_ask()
    }

    /// Shuts the engine down, returning every resting order from both sides sorted by arrival.
    pub fn shutdown(self) -> Vec<Unexecuted> {
        let mut remaining = self.book.into_orders();
        remaining.sort_by_key(|o| o.arrival_seq);
        info!("engine shutdown unexecuted_orders={}", remaining.len());
        remaining
            .into_iter()
            .map(|o| Unexecuted {
                order_id: o.order_id,
                quantity: o.quantity,
                arrival_seq: o.arrival_seq,
            })
            .collect()
    }
}
