//! Binary configuration: one positional argument plus environment variables.
//!
//! | Variable         | Default                | Meaning                                   |
//! |------------------|------------------------|-------------------------------------------|
//! | `OUTPUT_PATH`    | derived from input     | file receiving executions and unexecuted |
//! | `OUTPUT_FORMAT`  | `text`                 | `text` or `json`                          |
//! | `BOOK_VIEW`      | on                     | `0`/`false`/`off` disables the stdout view |
//! | `PRICE_DECIMALS` | `2`                    | digits after the decimal point            |
//!
//! Unparseable values fall back to the default.

use crate::error::EngineError;
use crate::report::PriceFormat;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format {:?}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub book_view: bool,
    pub price_format: PriceFormat,
}

impl Config {
    /// Builds the configuration from process arguments (program name first) and the process environment.
    pub fn from_env(args: &[String]) -> Result<Self, EngineError> {
        Self::from_parts(args, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit environment lookup.
    pub fn from_parts(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self, EngineError> {
        let [_, input] = args else {
            return Err(EngineError::Usage {
                program: args.first().cloned().unwrap_or_else(|| "auction_engine".into()),
            });
        };
        let input_path = PathBuf::from(input);
        let output_path = env("OUTPUT_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| derive_output_path(&input_path));
        let output_format = env("OUTPUT_FORMAT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(OutputFormat::Text);
        let book_view = env("BOOK_VIEW")
            .map(|s| !matches!(s.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no"))
            .unwrap_or(true);
        let decimals = env("PRICE_DECIMALS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(PriceFormat::default().decimals);
        Ok(Self {
            input_path,
            output_path,
            output_format,
            book_view,
            price_format: PriceFormat::new(decimals),
        })
    }
}

/// `input1.txt` -> `output1.txt`; any other name gets an `output_` prefix. Same directory as the input.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let derived = match name.strip_prefix("input") {
        Some(rest) => format!("output{}", rest),
        None => format!("output_{}", name),
    };
    input.with_file_name(derived)
}
