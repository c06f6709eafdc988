use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orderbook::types::{InstrumentId, Quantity};

/// Reasons an order is refused at submission.
///
/// Rejection happens before any book state changes. Nothing else in the engine
/// fails: an empty side, a partial fill or a book that does not cross are ordinary
/// outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum InvalidOrderError {
    /// Quantity must be strictly positive
    #[error("Invalid quantity: must be greater than zero")]
    ZeroQuantity,

    /// Price must be strictly positive
    #[error("Invalid price: must be greater than zero")]
    ZeroPrice,

    /// Remaining quantity larger than the quantity originally ordered
    #[error("Invalid quantity: remaining {remaining} exceeds original {original}")]
    QuantityExceedsOriginal {
        remaining: Quantity,
        original: Quantity,
    },

    /// Order was handed to the book of another instrument
    #[error("Order for {actual} submitted to the {expected} book")]
    InstrumentMismatch {
        expected: InstrumentId,
        actual: InstrumentId,
    },
}

/// Result type for order book operations
pub type OrderBookResult<T> = Result<T, InvalidOrderError>;
