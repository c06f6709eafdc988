//! Multi-instrument routing and trade observation

pub mod observer;
pub mod router;

pub use observer::{ChannelObserver, TracingObserver, TradeLog, TradeObserver};
pub use router::MarketRouter;
