use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::market::observer::TradeObserver;
use crate::orderbook::book::{validate_order, OrderBook};
use crate::orderbook::error::OrderBookResult;
use crate::orderbook::types::{BookSnapshot, InstrumentId, Order, Trade};

/// Routes orders to per-instrument books and keeps the global trade history.
///
/// A book is created the first time a valid order names its instrument and is
/// never removed. An order that fails validation creates nothing. Trades are
/// appended to the history and handed to every observer in the order the
/// matching loop produced them; submissions are processed one at a time, so the
/// history is also ordered by submission.
pub struct MarketRouter {
    config: EngineConfig,
    books: BTreeMap<InstrumentId, OrderBook>,
    history: Vec<Trade>,
    observers: Vec<Box<dyn TradeObserver>>,
}

impl MarketRouter {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            books: BTreeMap::new(),
            history: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register an observer. Observers are called in registration order.
    pub fn add_observer(&mut self, observer: impl TradeObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Route an order to its instrument's book and cross it.
    pub fn submit(&mut self, order: Order) -> OrderBookResult<Vec<Trade>> {
        if let Err(error) = validate_order(&order) {
            warn!(
                instrument = %order.instrument,
                participant = %order.participant,
                %error,
                "Order rejected"
            );
            return Err(error);
        }

        let book = match self.books.entry(order.instrument.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                info!(instrument = %entry.key(), "Opening book on first order");
                let book = OrderBook::with_config(entry.key().clone(), &self.config);
                entry.insert(book)
            }
        };

        let trades = book.submit(order)?;
        debug!(
            instrument = %book.instrument(),
            trades = trades.len(),
            history = self.history.len() + trades.len(),
            "Submission processed"
        );

        self.history.extend(trades.iter().cloned());
        for trade in &trades {
            for observer in self.observers.iter_mut() {
                observer.on_trade(trade);
            }
        }

        if self.config.publish_snapshots && !self.observers.is_empty() {
            let snapshot = book.snapshot();
            for observer in self.observers.iter_mut() {
                observer.on_book_update(&snapshot);
            }
        }

        Ok(trades)
    }

    /// Every trade so far, in emission order.
    pub fn history(&self) -> &[Trade] {
        &self.history
    }

    pub fn trades_for<'a>(&'a self, instrument: &'a str) -> impl Iterator<Item = &'a Trade> + 'a {
        self.history
            .iter()
            .filter(move |trade| trade.instrument == instrument)
    }

    pub fn book(&self, instrument: &str) -> Option<&OrderBook> {
        self.books.get(instrument)
    }

    /// Instruments with a book, in lexical order.
    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    pub fn books(&self) -> impl Iterator<Item = &OrderBook> {
        self.books.values()
    }

    pub fn snapshot(&self, instrument: &str) -> Option<BookSnapshot> {
        self.book(instrument).map(OrderBook::snapshot)
    }
}

impl Default for MarketRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MarketRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketRouter")
            .field("config", &self.config)
            .field("books", &self.books.len())
            .field("history", &self.history.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
