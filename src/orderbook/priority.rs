//! Price-time priority for the two sides of a book.
//!
//! Both comparators read orders only through [`PriorityKey`]. Quantity is not part
//! of the key, so the matching loop may decrement the quantity of a root order in
//! place without disturbing heap order. Any field added to the key must be immutable
//! for as long as the order rests.

use serde::{Deserialize, Serialize};

use crate::orderbook::heap::Priority;
use crate::orderbook::types::{Order, Price, SequenceNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriorityKey {
    pub price: Price,
    pub sequence: SequenceNumber,
}

/// Highest price first, then earliest arrival.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BidPriority;

impl BidPriority {
    #[inline]
    pub fn better_key(a: PriorityKey, b: PriorityKey) -> bool {
        a.price > b.price || (a.price == b.price && a.sequence < b.sequence)
    }
}

impl Priority<Order> for BidPriority {
    #[inline]
    fn better(&self, a: &Order, b: &Order) -> bool {
        Self::better_key(a.priority_key(), b.priority_key())
    }
}

/// Lowest price first, then earliest arrival.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AskPriority;

impl AskPriority {
    #[inline]
    pub fn better_key(a: PriorityKey, b: PriorityKey) -> bool {
        a.price < b.price || (a.price == b.price && a.sequence < b.sequence)
    }
}

impl Priority<Order> for AskPriority {
    #[inline]
    fn better(&self, a: &Order, b: &Order) -> bool {
        Self::better_key(a.priority_key(), b.priority_key())
    }
}
