use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::orderbook::heap::PriorityHeap;
use crate::orderbook::priority::{AskPriority, BidPriority};
use crate::orderbook::types::{Order, Price, SequenceNumber, Side, Trade};

pub type BidHeap = PriorityHeap<Order, BidPriority>;
pub type AskHeap = PriorityHeap<Order, AskPriority>;

/// Which order's limit price a trade executes at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPricing {
    /// Always the resting ask's price, whichever side arrived first.
    #[default]
    AskPrice,
    /// The price of whichever of the two orders arrived first.
    MakerPrice,
}

impl ExecutionPricing {
    pub fn execution_price(self, bid: &Order, ask: &Order) -> Price {
        match self {
            ExecutionPricing::AskPrice => ask.price(),
            ExecutionPricing::MakerPrice => {
                if bid.sequence() < ask.sequence() {
                    bid.price()
                } else {
                    ask.price()
                }
            }
        }
    }
}

/// A bid and an ask can trade when the bid pays at least the ask.
#[inline]
pub fn can_cross(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Crosses the best bid against the best ask until the book is quiescent
pub struct MatchingEngine;

impl MatchingEngine {
    /// Run the matching loop to a fixed point.
    ///
    /// Each iteration trades `min(bid, ask)` between the two roots and removes
    /// whichever root is exhausted. The loop ends when either side is empty or the
    /// best prices no longer cross; both are normal exits. `trade_sequence` holds
    /// the last trade sequence issued and is advanced once per trade.
    pub fn match_crossing(
        instrument: &str,
        bids: &mut BidHeap,
        asks: &mut AskHeap,
        pricing: ExecutionPricing,
        trade_sequence: &mut SequenceNumber,
    ) -> Vec<Trade> {
        let mut trades = Vec::new();

        while let (Some(bid), Some(ask)) = (bids.peek(), asks.peek()) {
            if !can_cross(bid.price(), ask.price()) {
                break;
            }

            *trade_sequence += 1;
            let trade = Self::execute(instrument, bid, ask, pricing, *trade_sequence);
            debug!(
                instrument = %instrument,
                sequence = trade.sequence,
                quantity = trade.quantity,
                price = trade.price,
                buyer = %trade.buyer,
                seller = %trade.seller,
                "Orders crossed"
            );

            let quantity = trade.quantity;
            let bid_filled = bids.update_root(|order| {
                order.fill(quantity);
                order.is_filled()
            });
            let ask_filled = asks.update_root(|order| {
                order.fill(quantity);
                order.is_filled()
            });

            if bid_filled == Some(true) {
                bids.extract_root();
            }
            if ask_filled == Some(true) {
                asks.extract_root();
            }

            trades.push(trade);
        }

        trades
    }

    fn execute(
        instrument: &str,
        bid: &Order,
        ask: &Order,
        pricing: ExecutionPricing,
        sequence: SequenceNumber,
    ) -> Trade {
        // The later arrival is the order that made the book cross
        let (taker, maker, aggressor) = if bid.sequence() > ask.sequence() {
            (bid, ask, Side::Bid)
        } else {
            (ask, bid, Side::Ask)
        };

        Trade {
            id: Uuid::new_v4(),
            sequence,
            instrument: instrument.to_string(),
            quantity: bid.quantity().min(ask.quantity()),
            price: pricing.execution_price(bid, ask),
            taker: taker.participant.clone(),
            maker: maker.participant.clone(),
            buyer: bid.participant.clone(),
            seller: ask.participant.clone(),
            buy_order_id: bid.id,
            sell_order_id: ask.id,
            aggressor,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resting(side: Side, quantity: u64, price: Price, participant: &str, sequence: u64) -> Order {
        let mut order = Order::new(side, "TEST", quantity, price, participant);
        order.assign_sequence(sequence);
        order
    }

    #[test]
    fn test_can_cross() {
        assert!(can_cross(60, 55));
        assert!(can_cross(58, 58));
        assert!(!can_cross(56, 58));
    }

    #[test]
    fn test_execution_pricing() {
        let bid = resting(Side::Bid, 10, 60, "early-buyer", 1);
        let ask = resting(Side::Ask, 10, 55, "late-seller", 2);

        assert_eq!(ExecutionPricing::AskPrice.execution_price(&bid, &ask), 55);
        assert_eq!(ExecutionPricing::MakerPrice.execution_price(&bid, &ask), 60);

        let early_ask = resting(Side::Ask, 10, 55, "early-seller", 1);
        let late_bid = resting(Side::Bid, 10, 60, "late-buyer", 2);
        assert_eq!(
            ExecutionPricing::MakerPrice.execution_price(&late_bid, &early_ask),
            55
        );
    }

    #[test]
    fn test_match_crossing_walks_the_ask_side() {
        let mut bids = BidHeap::default();
        let mut asks = AskHeap::default();
        asks.insert(resting(Side::Ask, 50, 62, "S2", 2));
        asks.insert(resting(Side::Ask, 20, 58, "S1", 1));
        bids.insert(resting(Side::Bid, 120, 65, "B", 3));

        let mut sequence = 0;
        let trades = MatchingEngine::match_crossing(
            "TEST",
            &mut bids,
            &mut asks,
            ExecutionPricing::AskPrice,
            &mut sequence,
        );

        assert_eq!(trades.len(), 2);
        assert_eq!((trades[0].quantity, trades[0].price), (20, 58));
        assert_eq!((trades[1].quantity, trades[1].price), (50, 62));
        assert_eq!(trades[0].sequence, 1);
        assert_eq!(trades[1].sequence, 2);
        assert_eq!(sequence, 2);

        for trade in &trades {
            assert_eq!(trade.taker, "B");
            assert_eq!(trade.buyer, "B");
            assert_eq!(trade.aggressor, Side::Bid);
        }
        assert_eq!(trades[0].maker, "S1");
        assert_eq!(trades[1].maker, "S2");

        assert!(asks.is_empty());
        assert_eq!(bids.peek().map(|o| o.quantity()), Some(50));
    }

    #[test]
    fn test_match_crossing_stops_without_cross() {
        let mut bids = BidHeap::default();
        let mut asks = AskHeap::default();
        bids.insert(resting(Side::Bid, 80, 56, "B", 1));
        asks.insert(resting(Side::Ask, 20, 58, "S", 2));

        let mut sequence = 0;
        let trades = MatchingEngine::match_crossing(
            "TEST",
            &mut bids,
            &mut asks,
            ExecutionPricing::AskPrice,
            &mut sequence,
        );

        assert!(trades.is_empty());
        assert_eq!(sequence, 0);
        assert_eq!(bids.len(), 1);
        assert_eq!(asks.len(), 1);
    }

    #[test]
    fn test_match_crossing_exact_fill_removes_both() {
        let mut bids = BidHeap::default();
        let mut asks = AskHeap::default();
        asks.insert(resting(Side::Ask, 40, 70, "S", 1));
        bids.insert(resting(Side::Bid, 40, 70, "B", 2));

        let mut sequence = 0;
        let trades = MatchingEngine::match_crossing(
            "TEST",
            &mut bids,
            &mut asks,
            ExecutionPricing::AskPrice,
            &mut sequence,
        );

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 40);
        assert!(bids.is_empty());
        assert!(asks.is_empty());
    }
}
