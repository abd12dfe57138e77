//! Benchmarks for segment interpretation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use swarm_core::{Chunk, FileInfo, FileTable};
use swarm_interpret::{Interpreter, InterpreterSettings};

/// Several peers streaming contiguous runs, interleaved chunk by chunk.
fn interleaved_stream(peers: u64, chunks_per_peer: u64) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for step in 0..chunks_per_peer {
        for peer in 0..peers {
            let id = step * peers + peer;
            let begin = peer * 10_000_000 + step * 16_384;
            chunks.push(Chunk::new(
                id,
                id as f64 * 0.01,
                begin,
                begin + 16_384,
                format!("10.0.{peer}.1"),
                0,
            ));
        }
    }
    chunks
}

fn files() -> FileTable {
    FileTable::from_list([FileInfo::new(100_000_000, 600.0)])
}

fn bench_interpret(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpret");
    let files = files();

    for peers in [1u64, 10, 50] {
        let stream = interleaved_stream(peers, 200);
        group.bench_with_input(BenchmarkId::new("peers", peers), &stream, |b, stream| {
            b.iter(|| {
                let mut chunks = stream.clone();
                Interpreter::default()
                    .interpret(black_box(&mut chunks), Some(&files))
                    .unwrap()
            });
        });
    }

    let stream = interleaved_stream(10, 200);
    let capped = Interpreter::new(InterpreterSettings::default().with_max_segment_duration(2.0));
    group.bench_function("max_segment_duration/10_peers", |b| {
        b.iter(|| {
            let mut chunks = stream.clone();
            capped
                .interpret(black_box(&mut chunks), Some(&files))
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_interpret);
criterion_main!(benches);
