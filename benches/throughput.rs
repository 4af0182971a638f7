//! Output throughput of every family, scalar against lanes.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ctrblock::{Family, Generator};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use std::hint::black_box;

/// Bytes generated per iteration.
const BUF_LEN: usize = 64 * 1024;

fn bench_fill_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_bytes");
    group.throughput(Throughput::Bytes(BUF_LEN as u64));
    for family in Family::ALL {
        for param in ["scalar", "vector"] {
            let mut seed = ChaCha8Rng::seed_from_u64(0);
            let Ok(mut rng) = Generator::create(family, &mut seed, param) else {
                continue;
            };
            let mut buf = vec![0u8; BUF_LEN];
            group.bench_with_input(BenchmarkId::new(rng.name(), BUF_LEN), &BUF_LEN, |b, _| {
                b.iter(|| rng.fill_bytes(black_box(&mut buf)));
            });
        }
    }
    group.finish();
}

/// One word per call, the way a test battery consumes a generator.
fn bench_next_word(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_word");
    for family in [Family::Philox4x32, Family::ChaCha, Family::Xtea] {
        let mut seed = ChaCha8Rng::seed_from_u64(1);
        let Ok(mut rng) = Generator::create(family, &mut seed, "vector") else {
            continue;
        };
        group.throughput(Throughput::Bytes(u64::from(rng.word_bits() / 8)));
        group.bench_function(rng.name(), |b| b.iter(|| black_box(rng.next_word())));
    }
    group.finish();
}

criterion_group!(benches, bench_fill_bytes, bench_next_word);
criterion_main!(benches);
