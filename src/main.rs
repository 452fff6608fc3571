//! Command-line front end: `auction_engine <input_file>`.
//!
//! Executions and the unexecuted report go to the output file (see [`auction_engine::config`]);
//! the live book view goes to stdout unless `BOOK_VIEW` disables it.

use auction_engine::{run, BookView, Config, JsonReport, OutputFormat, ReportSink, TextReport};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::process;

fn main() {
    let _ = env_logger::try_init();
    let args: Vec<String> = std::env::args().collect();
    let config = match Config::from_env(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let input = match File::open(&config.input_path) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            eprintln!("Error opening input file {}: {}", config.input_path.display(), e);
            process::exit(1);
        }
    };
    let output = match File::create(&config.output_path) {
        Ok(f) => BufWriter::new(f),
        Err(e) => {
            eprintln!("Error creating output file {}: {}", config.output_path.display(), e);
            process::exit(1);
        }
    };

    let mut report: Box<dyn ReportSink> = match config.output_format {
        OutputFormat::Text => Box::new(TextReport::new(output, config.price_format)),
        OutputFormat::Json => Box::new(JsonReport::new(output, config.price_format)),
    };
    let mut book_view = BookView::new(io::stdout().lock(), config.price_format);
    let result = if config.book_view {
        run(input, &mut [report.as_mut(), &mut book_view])
    } else {
        run(input, &mut [report.as_mut()])
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
    log::info!("output written to {}", config.output_path.display());
}
