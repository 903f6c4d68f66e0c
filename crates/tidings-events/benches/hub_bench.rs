//! Event hub throughput benchmarks
//!
//! Measures the publish/drain hot path and subscription churn.
//!
//! Run with: cargo bench --bench hub_bench

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use tidings_events::{Event, EventHub};

struct Reading(u32);
impl Event for Reading {}

struct Toggled(bool);
impl Event for Toggled {}

fn bench_publish_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_drain");

    for rounds in [1_000u32, 10_000] {
        group.throughput(Throughput::Elements(u64::from(rounds)));
        group.bench_with_input(BenchmarkId::from_parameter(rounds), &rounds, |b, &rounds| {
            b.iter(|| {
                let mut hub = EventHub::new();
                let token = hub.new_token();
                hub.register(token, |e: &Reading| {
                    black_box(e.0);
                })
                .ok();
                hub.register(token, |e: &Toggled| {
                    black_box(e.0);
                })
                .ok();

                for i in 0..rounds {
                    hub.publish(Reading(i));
                    hub.publish(Toggled(true));
                    black_box(hub.drain(token).ok());
                }
            });
        });
    }

    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");

    for groups in [1usize, 16, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(groups), &groups, |b, &groups| {
            let mut hub = EventHub::new();
            let tokens: Vec<_> = (0..groups)
                .map(|_| {
                    let token = hub.new_token();
                    hub.register(token, |e: &Reading| {
                        black_box(e.0);
                    })
                    .ok();
                    token
                })
                .collect();

            b.iter(|| {
                black_box(hub.publish(Reading(1)));
                for token in &tokens {
                    black_box(hub.drain(*token).ok());
                }
            });
        });
    }

    group.finish();
}

fn bench_register_unregister(c: &mut Criterion) {
    c.bench_function("register_unregister_1000_groups", |b| {
        b.iter(|| {
            let mut hub = EventHub::new();
            let tokens: Vec<_> = (0..1_000)
                .map(|_| {
                    let token = hub.new_token();
                    hub.register(token, |_: &Reading| {}).ok();
                    hub.register(token, |_: &Toggled| {}).ok();
                    token
                })
                .collect();

            for token in tokens {
                hub.unregister::<Toggled>(token).ok();
                hub.unregister::<Reading>(token).ok();
            }
            black_box(hub.group_count())
        });
    });
}

criterion_group!(
    benches,
    bench_publish_drain,
    bench_fan_out,
    bench_register_unregister
);
criterion_main!(benches);
