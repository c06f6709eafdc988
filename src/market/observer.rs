//! Trade-event sinks
//!
//! The engine never formats or prints anything. Whatever wants to see trades (a
//! console table, a metrics recorder, another thread) registers a
//! [`TradeObserver`] with the router.

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::orderbook::types::{BookSnapshot, MarketEvent, Trade};

/// Receives every trade the router emits, in emission order.
pub trait TradeObserver: Send {
    fn on_trade(&mut self, trade: &Trade);

    /// Called once per accepted submission, after its trades, when the router is
    /// configured to publish snapshots.
    fn on_book_update(&mut self, _snapshot: &BookSnapshot) {}
}

/// Emits one structured `tracing` event per trade.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TradeObserver for TracingObserver {
    fn on_trade(&mut self, trade: &Trade) {
        info!(
            instrument = %trade.instrument,
            sequence = trade.sequence,
            quantity = trade.quantity,
            price = trade.price,
            buyer = %trade.buyer,
            seller = %trade.seller,
            aggressor = %trade.aggressor,
            "Trade executed"
        );
    }
}

/// Forwards events onto a crossbeam channel.
///
/// A disconnected receiver is not an error for the engine; events are dropped.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<MarketEvent>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<MarketEvent>) -> Self {
        Self { sender }
    }

    pub fn unbounded() -> (Self, Receiver<MarketEvent>) {
        let (sender, receiver) = channel::unbounded();
        (Self::new(sender), receiver)
    }

    fn send(&self, event: MarketEvent) {
        if self.sender.send(event).is_err() {
            debug!("Market event receiver disconnected, dropping event");
        }
    }
}

impl TradeObserver for ChannelObserver {
    fn on_trade(&mut self, trade: &Trade) {
        self.send(MarketEvent::Trade {
            trade: trade.clone(),
        });
    }

    fn on_book_update(&mut self, snapshot: &BookSnapshot) {
        self.send(MarketEvent::BookSnapshot {
            snapshot: snapshot.clone(),
        });
    }
}

/// Collects trades into a log that clones of this handle share.
#[derive(Debug, Clone, Default)]
pub struct TradeLog {
    trades: Arc<Mutex<Vec<Trade>>>,
}

impl TradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trades(&self) -> Vec<Trade> {
        self.trades.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.trades.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.lock().is_empty()
    }
}

impl TradeObserver for TradeLog {
    fn on_trade(&mut self, trade: &Trade) {
        self.trades.lock().push(trade.clone());
    }
}
