//! Order-feed simulator
//!
//! Replays a CSV order feed through a [`MarketRouter`], printing each trade as it
//! happens, then the full trade history and the resting books.
//!
//! ```text
//! auction_sim --orders demos/orders.csv --metrics
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use auction_engine::{
    telemetry,
    utils::{format_price, price_to_ticks, quantity_from_signed},
    EngineConfig, EngineMetrics, MarketRouter, MetricsObserver, Order, OrderBook, Side, Trade,
    TracingObserver, TradeObserver,
};

#[derive(Debug, Parser)]
#[command(name = "auction_sim", about = "Replay an order feed through the matching engine")]
struct Args {
    /// CSV file with columns side,instrument,quantity,price,participant
    #[arg(long, default_value = "demos/orders.csv")]
    orders: PathBuf,

    /// Optional TOML engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_filter: String,

    /// Print Prometheus metrics after the replay
    #[arg(long)]
    metrics: bool,

    /// Also emit each trade as a structured log event
    #[arg(long)]
    log_trades: bool,
}

/// One line of the order feed. Prices are decimal currency, quantities may be
/// negative in bad feeds and are rejected by the engine.
#[derive(Debug, Deserialize)]
struct OrderRow {
    side: Side,
    instrument: String,
    quantity: i64,
    price: f64,
    participant: String,
}

impl OrderRow {
    fn into_order(self, tick_size: f64) -> Order {
        Order::new(
            self.side,
            self.instrument,
            quantity_from_signed(self.quantity),
            price_to_ticks(self.price, tick_size),
            self.participant,
        )
    }
}

/// Prints each trade as it executes.
struct ConsoleObserver {
    tick_size: f64,
}

impl TradeObserver for ConsoleObserver {
    fn on_trade(&mut self, trade: &Trade) {
        println!("{}", render_trade(trade, self.tick_size));
    }
}

fn render_trade(trade: &Trade, tick_size: f64) -> String {
    format!(
        "#{:<3} {:<10} {:>6} @ {:>10}  buyer={} seller={} aggressor={}",
        trade.sequence,
        trade.instrument,
        trade.quantity,
        format_price(trade.price, tick_size),
        trade.buyer,
        trade.seller,
        trade.aggressor,
    )
}

fn print_book(book: &OrderBook, tick_size: f64) {
    let snapshot = book.snapshot();
    println!("\n=== {} ===", snapshot.instrument);
    for level in snapshot.asks.iter().rev() {
        println!(
            "  ASK {:>10} x {:<6} ({} orders)",
            format_price(level.price, tick_size),
            level.quantity,
            level.order_count
        );
    }
    println!("  ----");
    for level in &snapshot.bids {
        println!(
            "  BID {:>10} x {:<6} ({} orders)",
            format_price(level.price, tick_size),
            level.quantity,
            level.order_count
        );
    }
    match book.spread() {
        Some(spread) => println!("  Spread: {}", format_price(spread, tick_size)),
        None => println!("  Spread: N/A"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(&args.log_filter);

    let prometheus = if args.metrics {
        Some(telemetry::install_prometheus_recorder().context("installing metrics recorder")?)
    } else {
        None
    };

    let config = EngineConfig::load(args.config.as_deref()).context("loading configuration")?;
    let tick_size = config.tick_size;
    info!(?config, "Starting auction simulator");

    let metrics = Arc::new(EngineMetrics::new());
    let mut market = MarketRouter::with_config(config);
    market.add_observer(ConsoleObserver { tick_size });
    market.add_observer(MetricsObserver::new(Arc::clone(&metrics)));
    if args.log_trades {
        market.add_observer(TracingObserver);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&args.orders)
        .with_context(|| format!("opening order feed {}", args.orders.display()))?;

    for (line, row) in reader.deserialize::<OrderRow>().enumerate() {
        let row = row.with_context(|| format!("parsing order feed record {}", line + 1))?;
        let order = row.into_order(tick_size);
        match metrics.time_submit(|| market.submit(order)) {
            Ok(_) => metrics.increment_orders_submitted(),
            Err(error) => {
                metrics.increment_orders_rejected();
                warn!(record = line + 1, %error, "Skipping rejected order");
            }
        }
    }

    println!("\nTrade history:");
    if market.history().is_empty() {
        println!("  No trades executed.");
    }
    for (index, trade) in market.history().iter().enumerate() {
        println!("{:>3}. {}", index + 1, render_trade(trade, tick_size));
    }

    for book in market.books() {
        print_book(book, tick_size);
    }

    let latency = metrics.get_submit_latency();
    info!(
        submitted = metrics.get_orders_submitted(),
        rejected = metrics.get_orders_rejected(),
        trades = metrics.get_trades_executed(),
        volume = metrics.get_total_volume(),
        avg_submit_us = latency.avg_micros(),
        max_submit_us = latency.max_micros(),
        "Replay complete"
    );

    if let Some(handle) = prometheus {
        println!("\n{}", handle.render());
    }

    Ok(())
}
