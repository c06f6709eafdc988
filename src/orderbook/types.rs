use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::orderbook::priority::PriorityKey;

pub type OrderId = Uuid;
pub type TradeId = Uuid;
pub type Price = u64; // Price in ticks
pub type Quantity = u64;
pub type SequenceNumber = u64;
pub type InstrumentId = String;
pub type ParticipantId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[serde(alias = "buy", alias = "BID", alias = "BUY")]
    Bid,
    #[serde(alias = "sell", alias = "ASK", alias = "SELL")]
    Ask,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Ask => write!(f, "ASK"),
        }
    }
}

/// A limit order.
///
/// The price and arrival sequence form the priority key and cannot change once the
/// order is accepted. Only the remaining quantity moves, and only the matching loop
/// moves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub instrument: InstrumentId,
    pub side: Side,
    pub participant: ParticipantId,
    price: Price,
    original_quantity: Quantity,
    remaining_quantity: Quantity,
    sequence: SequenceNumber,
    pub timestamp: DateTime<Utc>,
}

impl Order {
    pub fn new(
        side: Side,
        instrument: impl Into<InstrumentId>,
        quantity: Quantity,
        price: Price,
        participant: impl Into<ParticipantId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            instrument: instrument.into(),
            side,
            participant: participant.into(),
            price,
            original_quantity: quantity,
            remaining_quantity: quantity,
            sequence: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn bid(
        instrument: impl Into<InstrumentId>,
        quantity: Quantity,
        price: Price,
        participant: impl Into<ParticipantId>,
    ) -> Self {
        Self::new(Side::Bid, instrument, quantity, price, participant)
    }

    pub fn ask(
        instrument: impl Into<InstrumentId>,
        quantity: Quantity,
        price: Price,
        participant: impl Into<ParticipantId>,
    ) -> Self {
        Self::new(Side::Ask, instrument, quantity, price, participant)
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.remaining_quantity
    }

    pub fn original_quantity(&self) -> Quantity {
        self.original_quantity
    }

    pub fn filled_quantity(&self) -> Quantity {
        self.original_quantity.saturating_sub(self.remaining_quantity)
    }

    /// Arrival sequence within the order's book; 0 until the book accepts it.
    pub fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// The fields heap ordering is allowed to look at.
    pub fn priority_key(&self) -> PriorityKey {
        PriorityKey {
            price: self.price,
            sequence: self.sequence,
        }
    }

    pub(crate) fn assign_sequence(&mut self, sequence: SequenceNumber) {
        self.sequence = sequence;
    }

    pub(crate) fn fill(&mut self, quantity: Quantity) {
        debug_assert!(
            quantity <= self.remaining_quantity,
            "fill of {} exceeds remaining {}",
            quantity,
            self.remaining_quantity
        );
        self.remaining_quantity -= quantity;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    /// Position of this trade within its instrument's book, starting at 1.
    pub sequence: SequenceNumber,
    pub instrument: InstrumentId,
    pub quantity: Quantity,
    pub price: Price,
    pub taker: ParticipantId,
    pub maker: ParticipantId,
    pub buyer: ParticipantId,
    pub seller: ParticipantId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    /// Side of the taker.
    pub aggressor: Side,
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    pub fn notional(&self) -> u64 {
        self.price.saturating_mul(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub instrument: InstrumentId,
    pub timestamp: DateTime<Utc>,
    pub bids: Vec<PriceLevelInfo>,
    pub asks: Vec<PriceLevelInfo>,
    pub last_trade_price: Option<Price>,
}

impl BookSnapshot {
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|level| level.price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|level| level.price)
    }
}

/// Aggregate of the resting orders at one price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevelInfo {
    pub price: Price,
    pub quantity: Quantity,
    pub order_count: u32,
}

// Market data events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    Trade { trade: Trade },
    BookSnapshot { snapshot: BookSnapshot },
}
