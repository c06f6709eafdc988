//! Core order book implementation module
//!
//! A book keeps each side in a [`PriorityHeap`]: bids under [`BidPriority`],
//! asks under [`AskPriority`]. Matching runs to a fixed point after every
//! submission.

pub mod book;
pub mod error;
pub mod heap;
pub mod matching;
pub mod priority;
pub mod types;

// Re-export main types for convenience
pub use book::{validate_order, OrderBook, OrderBookStats};
pub use error::{InvalidOrderError, OrderBookResult};
pub use heap::{MaxFirst, MinFirst, Priority, PriorityHeap};
pub use matching::{can_cross, ExecutionPricing, MatchingEngine};
pub use priority::{AskPriority, BidPriority, PriorityKey};
pub use types::{
    BookSnapshot, InstrumentId, MarketEvent, Order, OrderId, ParticipantId, Price,
    PriceLevelInfo, Quantity, SequenceNumber, Side, Trade, TradeId,
};
