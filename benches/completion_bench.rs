//! Completion path benchmarks.
//!
//! Measures the uncontended costs an API call pays per event:
//! - Complete then get on the same thread
//! - Get on an already settled event
//! - Chaining an event to a source and resolving it
//! - Cross-thread handoff with a blocked waiter

#![allow(missing_docs)]
#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::thread;
use std::time::Duration;

use appevent::event::{CompletableEvent, EventKind};
use appevent::future::EventFuture;
use appevent::time::Timer;

// =============================================================================
// SINGLE-THREAD BENCHMARKS
// =============================================================================

fn bench_complete_then_get(c: &mut Criterion) {
    c.bench_function("event/complete_then_get", |b| {
        b.iter(|| {
            let event = CompletableEvent::new(EventKind::Commit);
            event.complete_success(black_box(42_u64));
            black_box(event.get(&Duration::ZERO))
        })
    });
}

fn bench_get_settled(c: &mut Criterion) {
    let event = CompletableEvent::new(EventKind::ListOffsets);
    event.complete_success(7_u64);
    let timer = Timer::new(Duration::from_secs(60));

    c.bench_function("event/get_settled", |b| {
        b.iter(|| black_box(event.get(&timer)))
    });
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("event/chain");
    for depth in [1_usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let source: EventFuture<u64> = EventFuture::new();
                let mut events = Vec::with_capacity(depth);
                let first = CompletableEvent::new(EventKind::FetchCommittedOffsets);
                first.chain(&source);
                events.push(first);
                for _ in 1..depth {
                    let next = CompletableEvent::new(EventKind::FetchCommittedOffsets);
                    if let Some(prev) = events.last() {
                        next.chain(prev);
                    }
                    events.push(next);
                }
                source.complete(black_box(1));
                black_box(events.last().map(CompletableEvent::is_done))
            })
        });
    }
    group.finish();
}

// =============================================================================
// CROSS-THREAD BENCHMARKS
// =============================================================================

fn bench_cross_thread_handoff(c: &mut Criterion) {
    c.bench_function("event/cross_thread_handoff", |b| {
        b.iter(|| {
            let event = CompletableEvent::new(EventKind::Poll);
            let producer = event.future().clone();
            let handle = thread::spawn(move || producer.complete(black_box(1_u32)));
            let value = event.get(&Duration::from_secs(5));
            let _ = handle.join();
            black_box(value)
        })
    });
}

criterion_group!(
    benches,
    bench_complete_then_get,
    bench_get_settled,
    bench_chain,
    bench_cross_thread_handoff,
);
criterion_main!(benches);
