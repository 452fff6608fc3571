//! Continuous double-auction matching.
//!
//! [`match_order`] runs one incoming order against the opposite side of the book until
//! it is exhausted or the best counter-order no longer crosses, then rests the remainder.
//! [`crosses`] and [`execution_price`] hold the per-pair rules.

use crate::error::EngineError;
use crate::execution::Trade;
use crate::order_book::OrderBook;
use crate::types::{Order, Side, TradeId};
use log::debug;
use rust_decimal::Decimal;

/// Result of matching one order.
#[derive(Clone, Debug)]
pub struct MatchOutcome {
    /// Trades in the order they were generated.
    pub trades: Vec<Trade>,
    /// Quantity of the incoming order left resting on its own side (0 if fully filled).
    pub rested_quantity: u64,
}

/// True if `incoming` may trade against `resting`. Any market order on either side crosses.
pub fn crosses(incoming: &Order, resting: &Order) -> bool {
    match (incoming.limit_price(), resting.limit_price()) {
        (Some(incoming_px), Some(resting_px)) => match incoming.side {
            Side::Buy => incoming_px >= resting_px,
            Side::Sell => incoming_px <= resting_px,
        },
        _ => true,
    }
}

/// Price at which `incoming` trades against `resting`.
///
/// Two market orders trade at the last traded price. A market order against a limit
/// order trades at the limit price. Two limit orders trade at the price of whichever
/// arrived first.
pub fn execution_price(incoming: &Order, resting: &Order, last_traded_price: Decimal) -> Decimal {
    match (incoming.limit_price(), resting.limit_price()) {
        (None, None) => last_traded_price,
        (None, Some(resting_px)) => resting_px,
        (Some(incoming_px), None) => incoming_px,
        (Some(incoming_px), Some(resting_px)) => {
            if incoming.arrival_seq < resting.arrival_seq {
                incoming_px
            } else {
                resting_px
            }
        }
    }
}

/// Run matching for one order against the book. Updates `last_traded_price` after each trade
/// and rests any unfilled remainder on the order's own side.
pub fn match_order(
    book: &mut OrderBook,
    mut order: Order,
    last_traded_price: &mut Decimal,
    next_trade_id: u64,
) -> Result<MatchOutcome, EngineError> {
    let opposite = order.side.opposite();
    let mut trades = Vec::new();
    let mut trade_id = next_trade_id;

    while order.quantity > 0 {
        let Some(top) = book.best(opposite) else {
            break;
        };
        if !crosses(&order, top) {
            break;
        }
        let price = execution_price(&order, top, *last_traded_price);
        let quantity = order.quantity.min(top.quantity);
        let Some(fill) = book.fill_best(opposite, quantity) else {
            break;
        };
        let (buy_order_id, sell_order_id) = match order.side {
            Side::Buy => (order.order_id.clone(), fill.resting_order_id.clone()),
            Side::Sell => (fill.resting_order_id.clone(), order.order_id.clone()),
        };
        debug!(
            "fill resting_order={} quantity={} remaining={} fully_filled={}",
            fill.resting_order_id, fill.quantity, fill.remaining, fill.resting_fully_filled
        );
        trades.push(Trade {
            trade_id: TradeId(trade_id),
            buy_order_id,
            sell_order_id,
            price,
            quantity: fill.quantity,
            aggressor_side: order.side,
        });
        trade_id += 1;
        *last_traded_price = price;
        order.quantity -= fill.quantity;
    }

    let rested_quantity = order.quantity;
    if rested_quantity > 0 {
        book.add_order(order)?;
    }
    Ok(MatchOutcome {
        trades,
        rested_quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderRequest;

    fn limit(id: &str, seq: u64, side: Side, qty: u64, price: i64) -> Order {
        Order::from_request(OrderRequest::limit(id, side, qty, Decimal::from(price)), seq)
    }

    fn market(id: &str, seq: u64, side: Side, qty: u64) -> Order {
        Order::from_request(OrderRequest::market(id, side, qty), seq)
    }

    #[test]
    fn crosses_limit_prices() {
        let bid = limit("b", 2, Side::Buy, 1, 100);
        assert!(crosses(&bid, &limit("s", 1, Side::Sell, 1, 100)));
        assert!(crosses(&bid, &limit("s", 1, Side::Sell, 1, 99)));
        assert!(!crosses(&bid, &limit("s", 1, Side::Sell, 1, 101)));

        let ask = limit("s", 2, Side::Sell, 1, 100);
        assert!(crosses(&ask, &limit("b", 1, Side::Buy, 1, 101)));
        assert!(!crosses(&ask, &limit("b", 1, Side::Buy, 1, 99)));
    }

    #[test]
    fn market_always_crosses() {
        let m = market("m", 2, Side::Buy, 1);
        assert!(crosses(&m, &limit("s", 1, Side::Sell, 1, 1_000_000)));
        let l = limit("s", 2, Side::Sell, 1, 1_000_000);
        assert!(crosses(&l, &market("b", 1, Side::Buy, 1)));
    }

    #[test]
    fn execution_price_cases() {
        let last = Decimal::from(50);
        let m_in = market("m1", 3, Side::Buy, 1);
        let m_rest = market("m2", 1, Side::Sell, 1);
        let l_rest = limit("l1", 2, Side::Sell, 1, 49);
        let l_in = limit("l2", 4, Side::Buy, 1, 52);

        assert_eq!(execution_price(&m_in, &m_rest, last), last);
        assert_eq!(execution_price(&m_in, &l_rest, last), Decimal::from(49));
        assert_eq!(execution_price(&l_in, &m_rest, last), Decimal::from(52));
        assert_eq!(execution_price(&l_in, &l_rest, last), Decimal::from(49));
        // Earlier arrival's price wins regardless of which one is incoming.
        let early_in = limit("l3", 1, Side::Buy, 1, 55);
        assert_eq!(execution_price(&early_in, &l_rest, last), Decimal::from(55));
    }

    #[test]
    fn two_orders_match_full() {
        let mut book = OrderBook::new();
        book.add_order(limit("S1", 1, Side::Sell, 10, 100)).unwrap();
        let mut last = Decimal::from(90);
        let outcome = match_order(&mut book, limit("B1", 2, Side::Buy, 10, 100), &mut last, 1).unwrap();
        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].quantity, 10);
        assert_eq!(outcome.trades[0].price, Decimal::from(100));
        assert_eq!(outcome.trades[0].trade_id, TradeId(1));
        assert_eq!(outcome.rested_quantity, 0);
        assert_eq!(last, Decimal::from(100));
        assert!(book.is_empty());
    }

    #[test]
    fn partial_fill_then_rest_on_book() {
        let mut book = OrderBook::new();
        book.add_order(limit("S1", 1, Side::Sell, 5, 100)).unwrap();
        let mut last = Decimal::from(100);
        let outcome = match_order(&mut book, limit("B1", 2, Side::Buy, 10, 100), &mut last, 1).unwrap();
        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].quantity, 5);
        assert_eq!(outcome.rested_quantity, 5);
        let resting = book.best(Side::Buy).unwrap();
        assert_eq!(resting.order_id.0, "B1");
        assert_eq!(resting.quantity, 5);
        assert_eq!(book.len(Side::Sell), 0);
    }

    #[test]
    fn sweeps_levels_in_priority_order() {
        let mut book = OrderBook::new();
        book.add_order(limit("S1", 1, Side::Sell, 3, 102)).unwrap();
        book.add_order(limit("S2", 2, Side::Sell, 3, 101)).unwrap();
        book.add_order(limit("S3", 3, Side::Sell, 3, 101)).unwrap();
        book.add_order(limit("S4", 4, Side::Sell, 3, 103)).unwrap();
        let mut last = Decimal::from(100);
        let outcome = match_order(&mut book, limit("B1", 5, Side::Buy, 8, 102), &mut last, 7).unwrap();
        let sellers: Vec<&str> = outcome.trades.iter().map(|t| t.sell_order_id.0.as_str()).collect();
        assert_eq!(sellers, vec!["S2", "S3", "S1"]);
        let qtys: Vec<u64> = outcome.trades.iter().map(|t| t.quantity).collect();
        assert_eq!(qtys, vec![3, 3, 2]);
        let ids: Vec<u64> = outcome.trades.iter().map(|t| t.trade_id.0).collect();
        assert_eq!(ids, vec![7, 8, 9]);
        assert_eq!(last, Decimal::from(102));
        assert_eq!(outcome.rested_quantity, 0);
        // S1 keeps 1, S4 untouched.
        assert_eq!(book.best(Side::Sell).unwrap().quantity, 1);
        assert_eq!(book.len(Side::Sell), 2);
    }

    #[test]
    fn stops_when_best_does_not_cross() {
        let mut book = OrderBook::new();
        book.add_order(limit("S1", 1, Side::Sell, 5, 100)).unwrap();
        book.add_order(limit("S2", 2, Side::Sell, 5, 105)).unwrap();
        let mut last = Decimal::from(100);
        let outcome = match_order(&mut book, limit("B1", 3, Side::Buy, 10, 101), &mut last, 1).unwrap();
        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].sell_order_id.0, "S1");
        assert_eq!(outcome.rested_quantity, 5);
        assert_eq!(book.best_bid(), Some(Decimal::from(101)));
        assert_eq!(book.best_ask(), Some(Decimal::from(105)));
    }

    #[test]
    fn market_against_market_uses_last_traded_price() {
        let mut book = OrderBook::new();
        book.add_order(market("S1", 1, Side::Sell, 4)).unwrap();
        let mut last = Decimal::new(4250, 2);
        let outcome = match_order(&mut book, market("B1", 2, Side::Buy, 4), &mut last, 1).unwrap();
        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].price, Decimal::new(4250, 2));
        assert_eq!(outcome.trades[0].aggressor_side, Side::Buy);
        assert!(book.is_empty());
    }

    #[test]
    fn resting_market_is_matched_before_better_limit() {
        let mut book = OrderBook::new();
        book.add_order(limit("B1", 1, Side::Buy, 5, 110)).unwrap();
        book.add_order(market("B2", 2, Side::Buy, 5)).unwrap();
        let mut last = Decimal::from(100);
        let outcome = match_order(&mut book, limit("S1", 3, Side::Sell, 5, 105), &mut last, 1).unwrap();
        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].buy_order_id.0, "B2");
        // Incoming limit against resting market: incoming price.
        assert_eq!(outcome.trades[0].price, Decimal::from(105));
        assert_eq!(book.best(Side::Buy).unwrap().order_id.0, "B1");
    }

    #[test]
    fn unmatched_market_order_rests() {
        let mut book = OrderBook::new();
        let mut last = Decimal::from(50);
        let outcome = match_order(&mut book, market("B1", 1, Side::Buy, 5), &mut last, 1).unwrap();
        assert!(outcome.trades.is_empty());
        assert_eq!(outcome.rested_quantity, 5);
        assert!(book.best(Side::Buy).unwrap().is_market());
        assert_eq!(last, Decimal::from(50));
    }

    #[test]
    fn invariant_no_zero_quantity_resting_after_matching() {
        let mut book = OrderBook::new();
        book.add_order(limit("S1", 1, Side::Sell, 5, 100)).unwrap();
        book.add_order(limit("S2", 2, Side::Sell, 5, 100)).unwrap();
        let mut last = Decimal::from(100);
        match_order(&mut book, limit("B1", 3, Side::Buy, 5, 100), &mut last, 1).unwrap();
        for side in [Side::Buy, Side::Sell] {
            for o in book.orders(side) {
                assert!(o.quantity > 0, "resting order {} has zero quantity", o.order_id);
                assert_eq!(o.side, side);
            }
        }
        assert_eq!(book.len(Side::Sell), 1);
    }
}
