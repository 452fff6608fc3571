//! Order file parsing.
//!
//! Format: the first non-blank line starts with the initial reference price; every
//! following non-blank line is `<id> <B|S> <quantity> [<price>]`. A line whose price is
//! missing or unparseable is a market order. Records are produced lazily, one per line.

use crate::error::EngineError;
use crate::types::{OrderId, OrderRequest, OrderType, Side};
use rust_decimal::Decimal;
use std::io::{BufRead, Lines};
use std::str::FromStr;

/// Lazy reader over an order file. Create with [`OrderReader::new`], which consumes the seed price.
pub struct OrderReader<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: BufRead> OrderReader<R> {
    /// Reads the initial reference price and returns it with a reader positioned at the first order.
    pub fn new(input: R) -> Result<(Decimal, Self), EngineError> {
        let mut reader = Self {
            lines: input.lines(),
            line_number: 0,
        };
        let seed_line = reader
            .next_non_blank()?
            .ok_or_else(|| EngineError::SeedPrice("input is empty".into()))?;
        let seed = parse_seed_price(&seed_line)?;
        Ok((seed, reader))
    }

    /// Line number (1-based) of the most recently read line.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn next_non_blank(&mut self) -> Result<Option<String>, EngineError> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_number += 1;
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}

impl<R: BufRead> Iterator for OrderReader<R> {
    type Item = Result<OrderRequest, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_non_blank() {
            Ok(Some(line)) => Some(parse_order_line(&line)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Parses the first token of `line` as the initial reference price; the rest of the line is ignored.
pub fn parse_seed_price(line: &str) -> Result<Decimal, EngineError> {
    let token = line
        .split_whitespace()
        .next()
        .ok_or_else(|| EngineError::SeedPrice("line is blank".into()))?;
    parse_price(token).ok_or_else(|| EngineError::SeedPrice(format!("cannot parse {:?}", token)))
}

/// Parses one order record. Tokens after the price are ignored.
pub fn parse_order_line(line: &str) -> Result<OrderRequest, EngineError> {
    let mut tokens = line.split_whitespace();
    let order_id = OrderId(tokens.next().unwrap_or_default().to_string());
    let side = match tokens.next() {
        Some("B") => Side::Buy,
        Some("S") => Side::Sell,
        Some(other) => {
            return Err(EngineError::invalid_order(&order_id, format!("unrecognized side {:?}", other)))
        }
        None => return Err(EngineError::invalid_order(&order_id, "missing side")),
    };
    let quantity = match tokens.next().map(u64::from_str) {
        Some(Ok(q)) if q > 0 => q,
        Some(_) => return Err(EngineError::invalid_order(&order_id, "quantity must be a positive integer")),
        None => return Err(EngineError::invalid_order(&order_id, "missing quantity")),
    };
    let price = tokens.next().and_then(parse_price);
    let order_type = if price.is_some() {
        OrderType::Limit
    } else {
        OrderType::Market
    };
    Ok(OrderRequest {
        order_id,
        side,
        order_type,
        quantity,
        price,
    })
}

fn parse_price(token: &str) -> Option<Decimal> {
    Decimal::from_str(token)
        .or_else(|_| Decimal::from_scientific(token))
        .ok()
}
