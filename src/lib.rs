//! # Auction Engine
//!
//! Deterministic single-instrument continuous double-auction matching engine: order
//! book, market/limit priority matching, and execution/unexecuted reports.
//!
//! ## Entry point
//!
//! Use [`Engine`] as the single entry point: create with [`Engine::new`] and a seed
//! reference price, then [`Engine::submit_order`]; finish with [`Engine::shutdown`].
//!
//! ## Example
//!
//! ```rust
//! use auction_engine::{Engine, OrderRequest, Side};
//! use rust_decimal::Decimal;
//!
//! let mut engine = Engine::new(Decimal::new(10000, 2));
//! let bid = OrderRequest::limit("B1", Side::Buy, 10, Decimal::new(10100, 2));
//! assert!(engine.submit_order(bid).unwrap().is_empty());
//!
//! let ask = OrderRequest::limit("S1", Side::Sell, 10, Decimal::new(9900, 2));
//! let trades = engine.submit_order(ask).unwrap();
//! assert_eq!(trades[0].price, Decimal::new(10100, 2));
//! assert!(engine.shutdown().is_empty());
//! ```
//!
//! ## Lower-level API
//!
//! You can also use [`OrderBook`] and [`match_order`] directly if you manage
//! arrival sequence numbers and trade IDs yourself. [`runner::run`] wires an input
//! file to [`ReportSink`]s the way the binary does.

pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod input;
pub mod market_data_gen;
pub mod matching;
pub mod order_book;
pub mod report;
pub mod runner;
pub mod types;

pub use config::{Config, OutputFormat};
pub use engine::{BookSnapshot, Engine};
pub use error::EngineError;
pub use execution::{Execution, FillRole, Trade, Unexecuted};
pub use input::OrderReader;
pub use market_data_gen::{replay_into_engine, Generator, GeneratorConfig};
pub use matching::{crosses, execution_price, match_order, MatchOutcome};
pub use order_book::{Fill, OrderBook};
pub use report::{BookView, JsonReport, PriceFormat, ReportSink, TextReport};
pub use runner::{run, RunSummary};
pub use types::{Order, OrderId, OrderRequest, OrderType, Side, TradeId};
