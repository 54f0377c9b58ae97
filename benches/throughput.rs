//! Benchmarks for pipeline throughput
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flowpipe::config::SourceConfig;
use flowpipe::greeting;
use flowpipe::pipeline::stages::{Map, Sink, Source};
use flowpipe::pipeline::PipelineRunner;
use flowpipe::{text, RunnerConfig};
use std::time::Duration;

fn runner(buffer_size: usize) -> PipelineRunner {
    PipelineRunner::new(RunnerConfig::default().with_buffer_size(buffer_size))
}

fn bench_greeting_network(c: &mut Criterion) {
    let mut group = c.benchmark_group("greeting_network");
    group.measurement_time(Duration::from_secs(10));

    let count = 10_000;
    group.throughput(Throughput::Elements(count as u64));

    for buffer_size in [1, 64, 16384].iter() {
        group.bench_with_input(
            BenchmarkId::new("buffer", buffer_size),
            buffer_size,
            |b, &buffer_size| {
                b.iter(|| {
                    let mut runner = runner(buffer_size);
                    let mut sink = Sink::new(|bytes: Vec<u8>| {
                        black_box(bytes);
                    });
                    let source = SourceConfig {
                        count,
                        ..SourceConfig::default()
                    };
                    greeting::assemble(&source, &mut runner, &mut sink.input).unwrap();
                    runner.register(sink);
                    runner.run().unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_map_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_chain");

    let count = 100_000u64;
    group.throughput(Throughput::Elements(count));

    for depth in [1usize, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::new("depth", depth), depth, |b, &depth| {
            b.iter(|| {
                let mut runner = runner(1024);
                let mut source = Source::with_capacity(1024, 0..count);
                let mut sink = Sink::new(|v: u64| {
                    black_box(v);
                });

                let mut maps: Vec<Map<u64, u64, fn(u64) -> u64>> = (0..depth)
                    .map(|_| Map::with_capacity(1024, (|x: u64| x.wrapping_add(1)) as fn(u64) -> u64))
                    .collect();

                let mut upstream = &mut source.output;
                for map in maps.iter_mut() {
                    upstream.connect(&mut map.input).unwrap();
                    upstream = &mut map.output;
                }
                upstream.connect(&mut sink.input).unwrap();

                runner.register(source);
                for map in maps {
                    runner.register(map);
                }
                runner.register(sink);
                runner.run().unwrap()
            });
        });
    }

    group.finish();
}

fn bench_text_helpers(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");
    let greeting = "Hi for the 123456:th time!".to_string();

    group.bench_function("halve", |b| {
        b.iter(|| black_box(text::halve(black_box(greeting.clone()))));
    });

    group.bench_function("halve_case_concat", |b| {
        b.iter(|| {
            let (left, right) = text::halve(black_box(greeting.clone()));
            black_box(text::concat(text::to_lower(left), text::to_upper(right)))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_greeting_network,
    bench_map_chain,
    bench_text_helpers
);
criterion_main!(benches);
