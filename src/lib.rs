//! Continuous double-auction matching engine
//!
//! Each instrument has an [`OrderBook`] holding two binary heaps of resting limit
//! orders. Bids are ordered by highest price first and asks by lowest price first,
//! with ties on both sides going to the earlier arrival. Every submission crosses
//! the book until the best bid is below the best ask, emitting a [`Trade`] per
//! partial or full fill.
//!
//! # Quick Start
//!
//! ```rust
//! use auction_engine::{MarketRouter, Order};
//!
//! let mut market = MarketRouter::new();
//!
//! market.submit(Order::ask("TechCorp", 100, 55, "Sofia"))?;
//! let trades = market.submit(Order::bid("TechCorp", 150, 60, "Carlos"))?;
//!
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].quantity, 100);
//! assert_eq!(trades[0].price, 55);
//!
//! let book = market.book("TechCorp").unwrap();
//! assert_eq!(book.best_bid(), Some(60));
//! assert_eq!(book.best_ask(), None);
//! # Ok::<(), auction_engine::InvalidOrderError>(())
//! ```
//!
//! # Architecture
//!
//! - [`orderbook::heap`]: array-backed binary heap generic over a comparator
//! - [`orderbook::priority`]: the bid and ask comparators over `(price, sequence)`
//! - [`orderbook::matching`]: the crossing loop and execution pricing
//! - [`market`]: per-instrument routing, trade history and observers
//!
//! The core does no I/O. Logging goes through `tracing`; metrics through the
//! `metrics` facade.

pub mod config;
pub mod market;
pub mod metrics;
pub mod orderbook;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types
pub use crate::config::EngineConfig;
pub use market::{ChannelObserver, MarketRouter, TracingObserver, TradeLog, TradeObserver};
pub use crate::metrics::{EngineMetrics, MetricsObserver};
pub use orderbook::{
    error::{InvalidOrderError, OrderBookResult},
    matching::ExecutionPricing,
    types::{BookSnapshot, MarketEvent, Order, OrderId, Price, Quantity, Side, Trade},
    OrderBook,
};
