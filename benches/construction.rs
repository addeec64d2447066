//! Construction and matching benchmarks on synthetic DNA
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mumtree::matches::{find_matches, find_matches_chunked, MatchMode};
use mumtree::stree::{SuffixTree, TreeConfig};

/// Pseudo-random DNA from a linear congruential generator
fn random_dna(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            b"acgt"[(state >> 62) as usize]
        })
        .collect()
}

/// A query sharing long stretches with `reference`, with point mutations
fn mutated(reference: &[u8], every: usize) -> Vec<u8> {
    reference
        .iter()
        .enumerate()
        .map(|(i, &b)| if i % every == every - 1 { b"acgt"[(i / every) % 4] } else { b })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for len in [10_000usize, 100_000, 1_000_000] {
        let text = random_dna(len, 42);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| SuffixTree::build(black_box(text)).unwrap())
        });
    }
    group.finish();
}

fn bench_chain_limit(c: &mut Criterion) {
    let text = random_dna(200_000, 7);
    let mut group = c.benchmark_group("chain_limit");
    for max_chain in [0u32, 16, 255] {
        let config = TreeConfig {
            max_chain,
            ..TreeConfig::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(max_chain), &config, |b, config| {
            b.iter(|| SuffixTree::build_with(black_box(&text), config).unwrap())
        });
    }
    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let reference = random_dna(500_000, 1);
    let query = mutated(&reference[100_000..300_000], 50);
    let tree = SuffixTree::build(&reference).unwrap();

    let mut group = c.benchmark_group("matching");
    group.throughput(Throughput::Bytes(query.len() as u64));
    for (name, mode) in [
        ("mum_candidates", MatchMode::MumCandidates),
        ("max_matches", MatchMode::MaxMatches),
    ] {
        group.bench_function(name, |b| b.iter(|| find_matches(&tree, black_box(&query), 20, mode)));
        group.bench_function(format!("{name}_chunked"), |b| {
            b.iter(|| find_matches_chunked(&tree, black_box(&query), 20, mode, 8))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_chain_limit, bench_matching);
criterion_main!(benches);
