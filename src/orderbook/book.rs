use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::orderbook::error::{InvalidOrderError, OrderBookResult};
use crate::orderbook::matching::{AskHeap, BidHeap, ExecutionPricing, MatchingEngine};
use crate::orderbook::priority::{AskPriority, BidPriority};
use crate::orderbook::types::{
    BookSnapshot, InstrumentId, Order, Price, PriceLevelInfo, SequenceNumber, Side, Trade,
};

/// Check the instrument-independent preconditions of an order.
pub fn validate_order(order: &Order) -> OrderBookResult<()> {
    if order.quantity() == 0 {
        return Err(InvalidOrderError::ZeroQuantity);
    }
    if order.price() == 0 {
        return Err(InvalidOrderError::ZeroPrice);
    }
    if order.quantity() > order.original_quantity() {
        return Err(InvalidOrderError::QuantityExceedsOriginal {
            remaining: order.quantity(),
            original: order.original_quantity(),
        });
    }
    Ok(())
}

/// Resting bids and asks for one instrument.
///
/// Every [`submit`](OrderBook::submit) runs the matching loop to completion, so
/// between calls the book is never crossed.
#[derive(Debug)]
pub struct OrderBook {
    instrument: InstrumentId,

    bids: BidHeap, // Highest price first
    asks: AskHeap, // Lowest price first

    pricing: ExecutionPricing,

    // Last issued sequence numbers
    order_sequence: SequenceNumber,
    trade_sequence: SequenceNumber,

    // Market state
    last_trade_price: Option<Price>,

    // Statistics
    total_trades: u64,
    total_volume: u64,
}

impl OrderBook {
    pub fn new(instrument: impl Into<InstrumentId>) -> Self {
        Self::with_config(instrument, &EngineConfig::default())
    }

    pub fn with_config(instrument: impl Into<InstrumentId>, config: &EngineConfig) -> Self {
        let instrument = instrument.into();
        info!(instrument = %instrument, pricing = ?config.execution_pricing, "Creating order book");

        Self {
            instrument,
            bids: BidHeap::with_capacity(config.initial_side_capacity, BidPriority),
            asks: AskHeap::with_capacity(config.initial_side_capacity, AskPriority),
            pricing: config.execution_pricing,
            order_sequence: 0,
            trade_sequence: 0,
            last_trade_price: None,
            total_trades: 0,
            total_volume: 0,
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn pricing(&self) -> ExecutionPricing {
        self.pricing
    }

    /// Check that this book would accept `order`.
    pub fn validate(&self, order: &Order) -> OrderBookResult<()> {
        validate_order(order)?;
        if order.instrument != self.instrument {
            return Err(InvalidOrderError::InstrumentMismatch {
                expected: self.instrument.clone(),
                actual: order.instrument.clone(),
            });
        }
        Ok(())
    }

    /// Accept an order and cross the book.
    ///
    /// A rejected order leaves the book untouched, including its sequence counters.
    pub fn submit(&mut self, mut order: Order) -> OrderBookResult<Vec<Trade>> {
        if let Err(error) = self.validate(&order) {
            warn!(instrument = %self.instrument, order_id = %order.id, %error, "Rejecting order");
            return Err(error);
        }

        self.order_sequence += 1;
        order.assign_sequence(self.order_sequence);
        debug!(
            instrument = %self.instrument,
            order_id = %order.id,
            side = %order.side,
            price = order.price(),
            quantity = order.quantity(),
            sequence = order.sequence(),
            "Accepting order"
        );

        match order.side {
            Side::Bid => self.bids.insert(order),
            Side::Ask => self.asks.insert(order),
        }

        let trades = MatchingEngine::match_crossing(
            &self.instrument,
            &mut self.bids,
            &mut self.asks,
            self.pricing,
            &mut self.trade_sequence,
        );

        if let Some(last) = trades.last() {
            self.last_trade_price = Some(last.price);
            self.total_trades = self.total_trades.saturating_add(trades.len() as u64);
            self.total_volume = trades
                .iter()
                .fold(self.total_volume, |total, t| total.saturating_add(t.quantity));
        }
        debug_assert!(!self.is_crossed());
        debug_assert!(self.is_well_formed());

        Ok(trades)
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.peek().map(Order::price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.peek().map(Order::price)
    }

    /// Get current spread
    pub fn spread(&self) -> Option<Price> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) if ask > bid => Some(ask - bid),
            _ => None,
        }
    }

    pub fn last_trade_price(&self) -> Option<Price> {
        self.last_trade_price
    }

    /// True if the best bid reaches the best ask. Never observable between submissions.
    pub fn is_crossed(&self) -> bool {
        matches!(
            (self.best_bid(), self.best_ask()),
            (Some(bid), Some(ask)) if bid >= ask
        )
    }

    /// Both sides satisfy the heap property and hold no exhausted orders.
    pub fn is_well_formed(&self) -> bool {
        self.bids.is_heap()
            && self.asks.is_heap()
            && self.bids.iter().chain(self.asks.iter()).all(|o| o.quantity() > 0)
    }

    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    pub fn ask_count(&self) -> usize {
        self.asks.len()
    }

    pub fn total_orders(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Resting orders of one side, best first.
    pub fn resting_orders(&self, side: Side) -> Vec<Order> {
        match side {
            Side::Bid => self.bids.to_sorted_vec(),
            Side::Ask => self.asks.to_sorted_vec(),
        }
    }

    /// Depth by price level, best level first on each side.
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            instrument: self.instrument.clone(),
            timestamp: Utc::now(),
            bids: aggregate_levels(self.resting_orders(Side::Bid)),
            asks: aggregate_levels(self.resting_orders(Side::Ask)),
            last_trade_price: self.last_trade_price,
        }
    }

    pub fn stats(&self) -> OrderBookStats {
        OrderBookStats {
            instrument: self.instrument.clone(),
            bid_orders: self.bid_count(),
            ask_orders: self.ask_count(),
            best_bid: self.best_bid(),
            best_ask: self.best_ask(),
            spread: self.spread(),
            last_trade_price: self.last_trade_price,
            total_trades: self.total_trades,
            total_volume: self.total_volume,
        }
    }
}

// Orders arrive in priority order, so equal prices are adjacent
fn aggregate_levels(orders: Vec<Order>) -> Vec<PriceLevelInfo> {
    let mut levels: Vec<PriceLevelInfo> = Vec::new();
    for order in orders {
        match levels.last_mut() {
            Some(level) if level.price == order.price() => {
                level.quantity = level.quantity.saturating_add(order.quantity());
                level.order_count = level.order_count.saturating_add(1);
            }
            _ => levels.push(PriceLevelInfo {
                price: order.price(),
                quantity: order.quantity(),
                order_count: 1,
            }),
        }
    }
    levels
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookStats {
    pub instrument: InstrumentId,
    pub bid_orders: usize,
    pub ask_orders: usize,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    pub spread: Option<Price>,
    pub last_trade_price: Option<Price>,
    pub total_trades: u64,
    pub total_volume: u64,
}
