//! Performance benchmarks for ebwt-inspect
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ebwt_inspect::core::{LineWidth, MemoryIndex, ReconstructionEngine};
use ebwt_inspect::formats::FastaWriter;
use std::io;

/// Deterministic pseudo-random reference with periodic N runs
fn synthetic_reference(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|i| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            if i % 5000 < 50 {
                b'N'
            } else {
                b"ACGT"[(state >> 62) as usize]
            }
        })
        .collect()
}

fn build_index(total: usize) -> MemoryIndex {
    let refs: Vec<(String, Vec<u8>)> = (0..4)
        .map(|i| (format!("chr{}", i + 1), synthetic_reference(total / 4, i as u64 + 1)))
        .collect();
    MemoryIndex::from_sequences(refs).expect("synthetic index")
}

/// Packed-store reconstruction throughput
fn bench_packed(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct_packed");

    for size in [10_000usize, 100_000, 1_000_000].iter() {
        let index = build_index(*size);
        let engine = ReconstructionEngine::with_line_width(LineWidth::default());
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &index, |b, index| {
            b.iter(|| {
                let mut out = FastaWriter::new(io::sink(), LineWidth::default());
                let stats = engine.reconstruct_packed(index, index, &mut out).unwrap();
                black_box(stats)
            })
        });
    }

    group.finish();
}

/// Joined traversal throughput
fn bench_joined(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct_joined");

    for size in [10_000usize, 100_000, 1_000_000].iter() {
        let index = build_index(*size);
        let engine = ReconstructionEngine::with_line_width(LineWidth::default());
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &index, |b, index| {
            b.iter(|| {
                let mut out = FastaWriter::new(io::sink(), LineWidth::default());
                let stats = engine.reconstruct_joined(index, index, &mut out).unwrap();
                black_box(stats)
            })
        });
    }

    group.finish();
}

/// FASTA wrapping at different widths
fn bench_fasta_wrap(c: &mut Criterion) {
    let seq = synthetic_reference(1_000_000, 7);
    let mut group = c.benchmark_group("fasta_wrap");
    group.throughput(Throughput::Bytes(seq.len() as u64));

    for across in [1i64, 60, 0] {
        let width = LineWidth::from_across(across).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(across), &width, |b, &width| {
            b.iter(|| {
                let mut out = FastaWriter::new(io::sink(), width);
                out.write_record("chr1", black_box(&seq)).unwrap();
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_packed, bench_joined, bench_fasta_wrap);
criterion_main!(benches);
