//! Benchmarks for frame splitting and event decoding.
//!
//! The splitter runs on every network read, so its cost should stay flat
//! regardless of how the transport chunks the body. These benchmarks feed
//! the same response body in whole, per-read and per-byte slices.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use oracle_chat::{decode_event, FrameSplitter};

/// A realistic response body: prose chunks interleaved with card events.
fn generate_body(frames: usize) -> String {
    let mut body = String::new();
    for i in 0..frames {
        let frame = match i % 5 {
            0 => format!(
                r#"{{"type":"seeking_card","content":"Card number {}"}}"#,
                i
            ),
            1 => format!(r#"{{"type":"found_card","id":"card-{:08x}"}}"#, i),
            _ => format!(
                r#"{{"type":"chunk","content":"Token {} of the answer, with some padding text. "}}"#,
                i
            ),
        };
        body.push_str("data: ");
        body.push_str(&frame);
        body.push_str("\r\n\r\n");
    }
    body.push_str("data: {\"type\":\"done\"}\n\n");
    body
}

fn split_in_chunks(body: &[u8], size: usize) -> usize {
    let mut splitter = FrameSplitter::new();
    let mut count = 0;
    for chunk in body.chunks(size) {
        count += splitter.push(chunk).len();
    }
    count
}

fn bench_frame_splitting(c: &mut Criterion) {
    let body = generate_body(500);
    let bytes = body.as_bytes();

    let mut group = c.benchmark_group("frame_splitting");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("whole_body", |b| {
        b.iter(|| split_in_chunks(black_box(bytes), bytes.len()))
    });

    // Typical network read size
    group.bench_function("chunks_1k", |b| {
        b.iter(|| split_in_chunks(black_box(bytes), 1024))
    });

    group.bench_function("chunks_16b", |b| {
        b.iter(|| split_in_chunks(black_box(bytes), 16))
    });

    group.finish();
}

fn bench_event_decoding(c: &mut Criterion) {
    let mut splitter = FrameSplitter::new();
    let payloads = splitter.push(generate_body(500).as_bytes());

    let mut group = c.benchmark_group("event_decoding");
    group.sample_size(100);

    group.bench_function("decode_500_payloads", |b| {
        b.iter(|| {
            payloads
                .iter()
                .map(|p| decode_event(black_box(p)))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_frame_splitting, bench_event_decoding);
criterion_main!(benches);
