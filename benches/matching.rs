//! Matching engine benchmarks.
//!
//! Run with: cargo bench --bench matching

use auction_engine::orderbook::{MaxFirst, PriorityHeap};
use auction_engine::{Order, OrderBook};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};

const INSTRUMENT: &str = "BENCH";

/// Benchmark resting an order that does not cross.
fn bench_insert_deep_book(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_deep_book");
    group.throughput(Throughput::Elements(1));

    for depth in [100u64, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let mut book = OrderBook::new(INSTRUMENT);
            for i in 0..depth {
                book.submit(Order::ask(INSTRUMENT, 100, 10_000 + i % 100, "maker"))
                    .unwrap();
            }

            b.iter(|| {
                // Below every ask, never matches
                black_box(book.submit(Order::bid(INSTRUMENT, 100, 9_990, "taker")).unwrap())
            })
        });
    }

    group.finish();
}

/// Benchmark one taker sweeping several resting makers.
fn bench_match_multiple(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_multiple");
    group.throughput(Throughput::Elements(1));

    for count in [1u64, 5, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || {
                    let mut book = OrderBook::new(INSTRUMENT);
                    for i in 0..count {
                        book.submit(Order::ask(INSTRUMENT, 10, 10_000 + i, "maker"))
                            .unwrap();
                    }
                    book
                },
                |mut book| {
                    let bid = Order::bid(INSTRUMENT, 10 * count, 10_000 + count, "taker");
                    black_box(book.submit(bid).unwrap())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark a mixed feed that alternately rests and crosses.
fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.throughput(Throughput::Elements(10_000));

    group.bench_function("mixed_workload", |b| {
        b.iter_batched(
            || OrderBook::new(INSTRUMENT),
            |mut book| {
                for i in 0..10_000u64 {
                    let price = 10_000 + (i % 10);
                    let order = if i % 2 == 0 {
                        Order::bid(INSTRUMENT, 100, price, "buyer")
                    } else {
                        Order::ask(INSTRUMENT, 100, price, "seller")
                    };
                    black_box(book.submit(order).unwrap());
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

/// Benchmark raw heap insert and extract.
fn bench_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap");
    group.throughput(Throughput::Elements(10_000));

    group.bench_function("insert_extract_10k", |b| {
        b.iter(|| {
            let mut heap = PriorityHeap::with_capacity(10_000, MaxFirst);
            for i in 0..10_000u64 {
                heap.insert(i.wrapping_mul(0x9E37_79B9_7F4A_7C15));
            }
            while let Some(value) = heap.extract_root() {
                black_box(value);
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_deep_book,
    bench_match_multiple,
    bench_throughput,
    bench_heap,
);

criterion_main!(benches);
