//! Drives an order stream through the engine into report sinks.
//!
//! Used by the binary and by integration tests. Records that fail to parse or are
//! rejected by the engine are logged and skipped; the stream continues.

use crate::engine::Engine;
use crate::error::EngineError;
use crate::input::OrderReader;
use crate::report::ReportSink;
use log::{info, warn};
use std::io::BufRead;

/// Counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub submitted: usize,
    pub rejected: usize,
    pub trades: usize,
    pub unexecuted: usize,
}

/// Reads the seed price and every order from `input`, matches them, and writes executions,
/// book views and the final unexecuted report to every sink.
pub fn run<R: BufRead>(input: R, sinks: &mut [&mut dyn ReportSink]) -> Result<RunSummary, EngineError> {
    let (seed, mut reader) = OrderReader::new(input)?;
    info!("run started initial_reference_price={}", seed);
    let mut engine = Engine::new(seed);
    let mut summary = RunSummary::default();

    while let Some(record) = reader.next() {
        let line = reader.line_number();
        let request = match record {
            Ok(request) => request,
            Err(EngineError::Io(e)) => return Err(EngineError::Io(e)),
            Err(e) => {
                warn!("line {} rejected: {}", line, e);
                summary.rejected += 1;
                continue;
            }
        };
        let trades = match engine.submit_order(request) {
            Ok(trades) => trades,
            Err(e) => {
                warn!("line {} rejected: {}", line, e);
                summary.rejected += 1;
                continue;
            }
        };
        summary.submitted += 1;
        summary.trades += trades.len();
        for trade in &trades {
            for execution in trade.executions() {
                for sink in sinks.iter_mut() {
                    sink.execution(&execution)?;
                }
            }
        }
        let snapshot = engine.book_snapshot();
        for sink in sinks.iter_mut() {
            sink.book(&snapshot)?;
        }
    }

    let unexecuted = engine.shutdown();
    summary.unexecuted = unexecuted.len();
    for order in &unexecuted {
        for sink in sinks.iter_mut() {
            sink.unexecuted(order)?;
        }
    }
    for sink in sinks.iter_mut() {
        sink.flush()?;
    }
    info!(
        "run finished submitted={} rejected={} trades={} unexecuted={}",
        summary.submitted, summary.rejected, summary.trades, summary.unexecuted
    );
    Ok(summary)
}
