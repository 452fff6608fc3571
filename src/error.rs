//! Error type shared by the engine core and its input/output collaborators.

use crate::types::OrderId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Order that must not reach the book (non-positive quantity, unknown side, limit without price).
    #[error("invalid order {order_id}: {reason}")]
    InvalidOrder { order_id: String, reason: String },

    /// Input did not start with a parseable initial reference price.
    #[error("missing or malformed initial reference price: {0}")]
    SeedPrice(String),

    #[error("Usage: {program} <input_file>")]
    Usage { program: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn invalid_order(order_id: &OrderId, reason: impl Into<String>) -> Self {
        EngineError::InvalidOrder {
            order_id: order_id.0.clone(),
            reason: reason.into(),
        }
    }
}
