use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::market::observer::TradeObserver;
use crate::orderbook::types::{BookSnapshot, Trade};

/// Metrics collector for engine submissions and trades
#[derive(Debug)]
pub struct EngineMetrics {
    // Latency tracking
    submit_latency: LatencyTracker,

    // Throughput counters
    orders_submitted: AtomicU64,
    orders_rejected: AtomicU64,
    trades_executed: AtomicU64,

    // Volume tracking
    total_volume: AtomicU64,
    total_notional: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        // Register metric descriptions
        describe_counter!("auction_orders_total", "Total number of orders submitted");
        describe_counter!("auction_trades_total", "Total number of trades executed");
        describe_counter!("auction_volume_total", "Total quantity traded");
        describe_histogram!(
            "auction_operation_duration_seconds",
            "Duration of engine operations"
        );
        describe_gauge!("auction_best_bid_ticks", "Best resting bid per instrument");
        describe_gauge!("auction_best_ask_ticks", "Best resting ask per instrument");
        describe_gauge!("auction_spread_ticks", "Current bid-ask spread in ticks");

        Self {
            submit_latency: LatencyTracker::new("submit"),
            orders_submitted: AtomicU64::new(0),
            orders_rejected: AtomicU64::new(0),
            trades_executed: AtomicU64::new(0),
            total_volume: AtomicU64::new(0),
            total_notional: AtomicU64::new(0),
        }
    }

    pub fn time_submit<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.submit_latency.time(f)
    }

    pub fn increment_orders_submitted(&self) {
        self.orders_submitted.fetch_add(1, Ordering::Relaxed);
        counter!("auction_orders_total", "outcome" => "accepted").increment(1);
    }

    pub fn increment_orders_rejected(&self) {
        self.orders_rejected.fetch_add(1, Ordering::Relaxed);
        counter!("auction_orders_total", "outcome" => "rejected").increment(1);
    }

    pub fn record_trade(&self, trade: &Trade) {
        let notional = trade.notional();
        saturating_add(&self.trades_executed, 1);
        saturating_add(&self.total_volume, trade.quantity);
        saturating_add(&self.total_notional, notional);

        let instrument = trade.instrument.clone();
        counter!("auction_trades_total", "instrument" => instrument.clone()).increment(1);
        counter!("auction_volume_total", "instrument" => instrument.clone())
            .increment(trade.quantity);
        counter!("auction_notional_total", "instrument" => instrument).increment(notional);
    }

    /// Publish top-of-book gauges. Empty sides leave their gauge untouched.
    pub fn record_book(&self, snapshot: &BookSnapshot) {
        let instrument = snapshot.instrument.clone();
        if let Some(bid) = snapshot.best_bid() {
            gauge!("auction_best_bid_ticks", "instrument" => instrument.clone()).set(bid as f64);
        }
        if let Some(ask) = snapshot.best_ask() {
            gauge!("auction_best_ask_ticks", "instrument" => instrument.clone()).set(ask as f64);
        }
        if let (Some(bid), Some(ask)) = (snapshot.best_bid(), snapshot.best_ask()) {
            gauge!("auction_spread_ticks", "instrument" => instrument)
                .set(ask.saturating_sub(bid) as f64);
        }
    }

    // Getters for current values
    pub fn get_orders_submitted(&self) -> u64 {
        self.orders_submitted.load(Ordering::Relaxed)
    }

    pub fn get_orders_rejected(&self) -> u64 {
        self.orders_rejected.load(Ordering::Relaxed)
    }

    pub fn get_trades_executed(&self) -> u64 {
        self.trades_executed.load(Ordering::Relaxed)
    }

    pub fn get_total_volume(&self) -> u64 {
        self.total_volume.load(Ordering::Relaxed)
    }

    pub fn get_total_notional(&self) -> u64 {
        self.total_notional.load(Ordering::Relaxed)
    }

    pub fn get_submit_latency(&self) -> OperationLatencyStats {
        self.submit_latency.get_stats()
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

// Counters stick at u64::MAX instead of wrapping
fn saturating_add(counter: &AtomicU64, value: u64) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        Some(current.saturating_add(value))
    });
}

/// Feeds router events into a shared [`EngineMetrics`].
#[derive(Debug, Clone)]
pub struct MetricsObserver {
    metrics: Arc<EngineMetrics>,
}

impl MetricsObserver {
    pub fn new(metrics: Arc<EngineMetrics>) -> Self {
        Self { metrics }
    }
}

impl TradeObserver for MetricsObserver {
    fn on_trade(&mut self, trade: &Trade) {
        self.metrics.record_trade(trade);
    }

    fn on_book_update(&mut self, snapshot: &BookSnapshot) {
        self.metrics.record_book(snapshot);
    }
}

/// Latency tracker for individual operations
#[derive(Debug)]
struct LatencyTracker {
    operation: &'static str,
    samples: AtomicU64,
    total_nanos: AtomicU64,
    min_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

impl LatencyTracker {
    fn new(operation: &'static str) -> Self {
        Self {
            operation,
            samples: AtomicU64::new(0),
            total_nanos: AtomicU64::new(0),
            min_nanos: AtomicU64::new(u64::MAX),
            max_nanos: AtomicU64::new(0),
        }
    }

    fn time<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record_latency(start.elapsed());
        result
    }

    fn record_latency(&self, duration: Duration) {
        let nanos = duration.as_nanos() as u64;

        saturating_add(&self.samples, 1);
        saturating_add(&self.total_nanos, nanos);
        self.min_nanos.fetch_min(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);

        histogram!("auction_operation_duration_seconds", "operation" => self.operation)
            .record(duration.as_secs_f64());
    }

    fn get_stats(&self) -> OperationLatencyStats {
        let samples = self.samples.load(Ordering::Relaxed);
        let total = self.total_nanos.load(Ordering::Relaxed);
        let min = self.min_nanos.load(Ordering::Relaxed);
        let max = self.max_nanos.load(Ordering::Relaxed);

        OperationLatencyStats {
            operation: self.operation,
            samples,
            avg_nanos: if samples > 0 { total / samples } else { 0 },
            min_nanos: if min == u64::MAX { 0 } else { min },
            max_nanos: max,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperationLatencyStats {
    pub operation: &'static str,
    pub samples: u64,
    pub avg_nanos: u64,
    pub min_nanos: u64,
    pub max_nanos: u64,
}

impl OperationLatencyStats {
    pub fn avg_micros(&self) -> f64 {
        self.avg_nanos as f64 / 1_000.0
    }

    pub fn min_micros(&self) -> f64 {
        self.min_nanos as f64 / 1_000.0
    }

    pub fn max_micros(&self) -> f64 {
        self.max_nanos as f64 / 1_000.0
    }
}
