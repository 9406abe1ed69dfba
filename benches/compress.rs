//! Benchmarks for optiflate compression throughput.
//!
//! Covers the full pipeline per level and the match finders on their own.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use optiflate::{
    compress, CachingMatchFinder, CostModel, ExhaustiveMatchFinder, HashChainMatchFinder, MatchFinder,
    OptimalParser,
};

/// Generate random (incompressible) data
fn generate_random_data(size: usize) -> Vec<u8> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut data = Vec::with_capacity(size);
    let mut hasher = DefaultHasher::new();

    for i in 0..size {
        i.hash(&mut hasher);
        data.push((hasher.finish() & 0xFF) as u8);
    }
    data
}

/// Generate DNA-like data (4 character alphabet, some patterns)
fn generate_dna_data(size: usize) -> Vec<u8> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let bases = [b'A', b'C', b'G', b'T'];
    let mut data = Vec::with_capacity(size);
    let mut hasher = DefaultHasher::new();

    let mut i = 0;
    while data.len() < size {
        if i % 1000 == 0 {
            data.extend_from_slice(&b"ATATATATAT".repeat(5));
        } else {
            i.hash(&mut hasher);
            data.push(bases[(hasher.finish() % 4) as usize]);
        }
        i += 1;
    }
    data.truncate(size);
    data
}

/// Generate word-like text
fn generate_text_data(size: usize) -> Vec<u8> {
    let words: [&[u8]; 10] =
        [b"lorem ", b"ipsum ", b"dolor ", b"sit ", b"amet ", b"tempor ", b"magna ", b"aliqua ", b"ut ", b"enim "];
    let mut data = Vec::with_capacity(size);
    let mut state = 0x2545_f491u32;
    while data.len() < size {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        data.extend_from_slice(words[(state % 10) as usize]);
    }
    data.truncate(size);
    data
}

fn bench_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("levels");
    let data = generate_text_data(64 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(10);

    for level in [1u8, 4, 6, 9] {
        group.bench_with_input(BenchmarkId::new("text", level), &data, |b, data| {
            b.iter(|| compress(data, level).unwrap());
        });
    }

    group.finish();
}

fn bench_data_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("data_patterns");
    let size = 64 * 1024;
    group.throughput(Throughput::Bytes(size as u64));
    group.sample_size(10);

    let random = generate_random_data(size);
    let dna = generate_dna_data(size);
    let repetitive = b"ABCD".repeat(size / 4);

    group.bench_function("random", |b| b.iter(|| compress(&random, 6).unwrap()));
    group.bench_function("dna", |b| b.iter(|| compress(&dna, 6).unwrap()));
    group.bench_function("repetitive", |b| b.iter(|| compress(&repetitive, 6).unwrap()));

    group.finish();
}

fn bench_finders(c: &mut Criterion) {
    let mut group = c.benchmark_group("finders");
    let data = generate_text_data(16 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(10);

    group.bench_function("hash_chain_parse", |b| {
        b.iter(|| {
            let mut finder = HashChainMatchFinder::default();
            finder.reset(&data);
            OptimalParser::new().parse(&data, &mut finder, CostModel::fixed(), 0..data.len()).unwrap()
        });
    });

    group.bench_function("exhaustive_parse", |b| {
        b.iter(|| {
            let mut finder = ExhaustiveMatchFinder::new(4096);
            finder.reset(&data);
            OptimalParser::new().parse(&data, &mut finder, CostModel::fixed(), 0..data.len()).unwrap()
        });
    });

    group.bench_function("cached_reparse", |b| {
        let mut finder = CachingMatchFinder::new(HashChainMatchFinder::default());
        finder.reset(&data);
        let mut parser = OptimalParser::new();
        parser.parse(&data, &mut finder, CostModel::fixed(), 0..data.len()).unwrap();
        b.iter(|| parser.parse(&data, &mut finder, CostModel::fixed(), 0..data.len()).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_levels, bench_data_patterns, bench_finders);
criterion_main!(benches);
