//! Synthetic order stream generator.
//!
//! Deterministic, configurable order stream for replay tests, property tests and benches.
//! Same seed ⇒ same sequence of orders.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::engine::Engine;
use crate::error::EngineError;
use crate::types::{OrderRequest, Side};

/// Configuration for the synthetic order generator.
/// All ranges are inclusive. Same config + seed produces the same stream.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed. Same seed ⇒ same order stream.
    pub seed: u64,
    /// Number of orders collected by [`Generator::all_orders`].
    pub num_orders: usize,
    /// Probability of Buy (0.0..=1.0). Sell otherwise.
    pub buy_ratio: f64,
    /// Probability of Limit order (0.0..=1.0). Market otherwise.
    pub limit_ratio: f64,
    /// Limit price range in cents (inclusive).
    pub price_min_cents: i64,
    pub price_max_cents: i64,
    /// Quantity range (inclusive).
    pub quantity_min: u64,
    pub quantity_max: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_orders: 1000,
            buy_ratio: 0.5,
            limit_ratio: 0.9,
            price_min_cents: 9_500,
            price_max_cents: 10_500,
            quantity_min: 1,
            quantity_max: 100,
        }
    }
}

/// Deterministic order stream. Create with [`Generator::new`]; call [`Generator::next_order`] or collect.
pub struct Generator {
    rng: StdRng,
    config: GeneratorConfig,
    next_order_id: u64,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            next_order_id: 1,
        }
    }

    /// Generates the next order. Ids are `gen-1`, `gen-2`, ...
    pub fn next_order(&mut self) -> OrderRequest {
        let order_id = format!("gen-{}", self.next_order_id);
        self.next_order_id += 1;
        let side = if self.rng.gen::<f64>() < self.config.buy_ratio {
            Side::Buy
        } else {
            Side::Sell
        };
        let is_limit = self.rng.gen::<f64>() < self.config.limit_ratio;
        let (qty_lo, qty_hi) = ordered(self.config.quantity_min.max(1), self.config.quantity_max.max(1));
        let quantity = self.rng.gen_range(qty_lo..=qty_hi);
        if is_limit {
            let (px_lo, px_hi) = ordered(self.config.price_min_cents, self.config.price_max_cents);
            let cents = self.rng.gen_range(px_lo..=px_hi);
            OrderRequest::limit(order_id, side, quantity, Decimal::new(cents, 2))
        } else {
            OrderRequest::market(order_id, side, quantity)
        }
    }

    pub fn take_orders(&mut self, n: usize) -> Vec<OrderRequest> {
        (0..n).map(|_| self.next_order()).collect()
    }

    /// Returns the full stream of orders as defined by `config.num_orders`.
    pub fn all_orders(&mut self) -> Vec<OrderRequest> {
        self.take_orders(self.config.num_orders)
    }
}

/// Range bounds in ascending order, so a reversed config still samples its span.
fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Replays a sequence of orders into the engine. Returns the total number of trades (or first error).
pub fn replay_into_engine(
    engine: &mut Engine,
    orders: impl IntoIterator<Item = OrderRequest>,
) -> Result<usize, EngineError> {
    let mut total_trades = 0usize;
    for order in orders {
        total_trades += engine.submit_order(order)?.len();
    }
    Ok(total_trades)
}
