//! Rendering of engine events.
//!
//! Text forms:
//! - `order <id> <qty> shares purchased at price <price>` / `... sold at price <price>`
//! - `order <id> <qty> shares unexecuted`
//!
//! Number formatting is carried explicitly by [`PriceFormat`]. [`ReportSink`] is the seam the
//! runner writes to; [`TextReport`], [`JsonReport`] and [`BookView`] are the provided sinks.

use crate::engine::BookSnapshot;
use crate::execution::{Execution, FillRole, Unexecuted};
use crate::types::{Order, OrderId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::io::{self, Write};

/// Fixed-point price formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceFormat {
    pub decimals: u32,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

impl PriceFormat {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    /// Rounds half away from zero, then pads to exactly `decimals` digits.
    pub fn format(&self, price: Decimal) -> String {
        let rounded = price.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.*}", self.decimals as usize, rounded)
    }
}

pub fn format_execution(execution: &Execution, format: &PriceFormat) -> String {
    let verb = match execution.role {
        FillRole::Bought => "purchased",
        FillRole::Sold => "sold",
    };
    format!(
        "order {} {} shares {} at price {}",
        execution.order_id,
        execution.quantity,
        verb,
        format.format(execution.price)
    )
}

pub fn format_unexecuted(order: &Unexecuted) -> String {
    format!("order {} {} shares unexecuted", order.order_id, order.quantity)
}

fn book_cell(order: &Order, format: &PriceFormat) -> String {
    let price = match order.limit_price() {
        Some(p) => format!("{} ", format.format(p)),
        None => "M     ".to_string(),
    };
    format!("{:<12}{}", order.order_id, price)
}

/// Side-by-side view of the book: last traded price, then bids and asks in arrival order.
pub fn render_book(snapshot: &BookSnapshot, format: &PriceFormat) -> String {
    let mut out = format!(
        "\nLast trading price: {}\nBuy                       Sell\n{}\n",
        format.format(snapshot.last_traded_price),
        "-".repeat(42)
    );
    let rows = snapshot.bids.len().max(snapshot.asks.len());
    for i in 0..rows {
        match snapshot.bids.get(i) {
            Some(buy) => out.push_str(&format!("{}{:<8}", book_cell(buy, format), buy.quantity)),
            None => out.push_str(&" ".repeat(25)),
        }
        if let Some(sell) = snapshot.asks.get(i) {
            out.push_str(&format!("{}{}", book_cell(sell, format), sell.quantity));
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Destination for engine events.
pub trait ReportSink {
    fn execution(&mut self, execution: &Execution) -> io::Result<()>;

    fn unexecuted(&mut self, order: &Unexecuted) -> io::Result<()>;

    /// Called after every accepted submission. Most sinks ignore it.
    fn book(&mut self, _snapshot: &BookSnapshot) -> io::Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()>;
}

/// Writes executions and unexecuted orders as text lines.
pub struct TextReport<W> {
    writer: W,
    format: PriceFormat,
}

impl<W: Write> TextReport<W> {
    pub fn new(writer: W, format: PriceFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn execution(&mut self, execution: &Execution) -> io::Result<()> {
        writeln!(self.writer, "{}", format_execution(execution, &self.format))
    }

    fn unexecuted(&mut self, order: &Unexecuted) -> io::Result<()> {
        writeln!(self.writer, "{}", format_unexecuted(order))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ReportEvent<'a> {
    Execution {
        order_id: &'a OrderId,
        quantity: u64,
        price: String,
        role: FillRole,
    },
    Unexecuted {
        order_id: &'a OrderId,
        quantity: u64,
    },
}

/// Writes one JSON object per event, one per line.
pub struct JsonReport<W> {
    writer: W,
    format: PriceFormat,
}

impl<W: Write> JsonReport<W> {
    pub fn new(writer: W, format: PriceFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_event(&mut self, event: &ReportEvent<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> ReportSink for JsonReport<W> {
    fn execution(&mut self, execution: &Execution) -> io::Result<()> {
        let event = ReportEvent::Execution {
            order_id: &execution.order_id,
            quantity: execution.quantity,
            price: self.format.format(execution.price),
            role: execution.role,
        };
        self.write_event(&event)
    }

    fn unexecuted(&mut self, order: &Unexecuted) -> io::Result<()> {
        self.write_event(&ReportEvent::Unexecuted {
            order_id: &order.order_id,
            quantity: order.quantity,
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Live book view after each submission; ignores executions.
pub struct BookView<W> {
    writer: W,
    format: PriceFormat,
}

impl<W: Write> BookView<W> {
    pub fn new(writer: W, format: PriceFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for BookView<W> {
    fn execution(&mut self, _execution: &Execution) -> io::Result<()> {
        Ok(())
    }

    fn unexecuted(&mut self, _order: &Unexecuted) -> io::Result<()> {
        Ok(())
    }

    fn book(&mut self, snapshot: &BookSnapshot) -> io::Result<()> {
        self.writer.write_all(render_book(snapshot, &self.format).as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderType, Side};

    fn execution(id: &str, role: FillRole, cents: i64) -> Execution {
        Execution {
            order_id: OrderId::from(id),
            quantity: 10,
            price: Decimal::new(cents, 2),
            role,
        }
    }

    fn resting(id: &str, side: Side, qty: u64, price: Option<Decimal>, seq: u64) -> Order {
        Order {
            order_id: OrderId::from(id),
            side,
            order_type: if price.is_some() { OrderType::Limit } else { OrderType::Market },
            quantity: qty,
            price,
            arrival_seq: seq,
        }
    }

    #[test]
    fn price_format_pads_and_rounds() {
        let f = PriceFormat::default();
        assert_eq!(f.format(Decimal::from(101)), "101.00");
        assert_eq!(f.format(Decimal::new(9995, 3)), "10.00");
        assert_eq!(f.format(Decimal::new(12345, 3)), "12.35");
        assert_eq!(PriceFormat::new(0).format(Decimal::new(995, 1)), "100");
        assert_eq!(PriceFormat::new(3).format(Decimal::new(5, 1)), "0.500");
    }

    #[test]
    fn execution_and_unexecuted_text() {
        let f = PriceFormat::default();
        assert_eq!(
            format_execution(&execution("B1", FillRole::Bought, 10100), &f),
            "order B1 10 shares purchased at price 101.00"
        );
        assert_eq!(
            format_execution(&execution("S1", FillRole::Sold, 4900), &f),
            "order S1 10 shares sold at price 49.00"
        );
        let u = Unexecuted {
            order_id: OrderId::from("B1"),
            quantity: 5,
            arrival_seq: 0,
        };
        assert_eq!(format_unexecuted(&u), "order B1 5 shares unexecuted");
    }

    #[test]
    fn render_book_side_by_side() {
        let snapshot = BookSnapshot {
            last_traded_price: Decimal::from(100),
            bids: vec![
                resting("B1", Side::Buy, 10, Some(Decimal::new(9950, 2)), 0),
                resting("B2", Side::Buy, 3, None, 2),
            ],
            asks: vec![resting("S1", Side::Sell, 7, Some(Decimal::from(101)), 1)],
        };
        let text = render_book(&snapshot, &PriceFormat::default());
        let expected = [
            "",
            "Last trading price: 100.00",
            "Buy                       Sell",
            "------------------------------------------",
            "B1          99.50 10      S1          101.00 7",
            "B2          M     3       ",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn render_book_sell_only_row_is_indented() {
        let snapshot = BookSnapshot {
            last_traded_price: Decimal::from(5),
            bids: vec![],
            asks: vec![resting("S1", Side::Sell, 2, None, 0)],
        };
        let text = render_book(&snapshot, &PriceFormat::default());
        assert!(text.contains(&format!("{}S1          M     2\n", " ".repeat(25))));
    }

    #[test]
    fn text_report_writes_lines() {
        let mut sink = TextReport::new(Vec::new(), PriceFormat::default());
        sink.execution(&execution("B1", FillRole::Bought, 100)).unwrap();
        sink.unexecuted(&Unexecuted {
            order_id: OrderId::from("S9"),
            quantity: 1,
            arrival_seq: 3,
        })
        .unwrap();
        sink.flush().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "order B1 10 shares purchased at price 1.00\norder S9 1 shares unexecuted\n"
        );
    }

    #[test]
    fn json_report_tags_events() {
        let mut sink = JsonReport::new(Vec::new(), PriceFormat::default());
        sink.execution(&execution("S1", FillRole::Sold, 4900)).unwrap();
        sink.unexecuted(&Unexecuted {
            order_id: OrderId::from("B1"),
            quantity: 6,
            arrival_seq: 1,
        })
        .unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["event"], "execution");
        assert_eq!(lines[0]["order_id"], "S1");
        assert_eq!(lines[0]["price"], "49.00");
        assert_eq!(lines[0]["role"], "sold");
        assert_eq!(lines[1]["event"], "unexecuted");
        assert_eq!(lines[1]["quantity"], 6);
    }

    #[test]
    fn book_view_ignores_executions() {
        let mut sink = BookView::new(Vec::new(), PriceFormat::default());
        sink.execution(&execution("B1", FillRole::Bought, 100)).unwrap();
        assert!(sink.into_inner().is_empty());
    }
}
