use bitcodec::{GorillaCompressor, GorillaDecompressor};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn varying_values(n: usize) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let dist = Normal::new(100.0, 5.0).unwrap();
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

fn constant_values(n: usize) -> Vec<f64> {
    vec![7.5; n]
}

fn encode(values: &[f64]) -> Vec<u8> {
    let mut compressor: GorillaCompressor<Vec<u8>, f64> = GorillaCompressor::new(Vec::new());
    for &v in values {
        compressor.add(v).unwrap();
    }
    compressor.finish().unwrap();
    compressor.into_inner()
}

fn decode(bytes: &[u8], count: usize) {
    let mut decompressor: GorillaDecompressor<&[u8], f64> = GorillaDecompressor::new(bytes);
    for _ in 0..count {
        black_box(decompressor.get().unwrap());
    }
}

fn bench_gorilla(c: &mut Criterion) {
    let n = 10_000;
    let varying = varying_values(n);
    let constant = constant_values(n);
    let varying_bytes = encode(&varying);
    let constant_bytes = encode(&constant);

    c.bench_function("gorilla_encode_varying", |b| {
        b.iter(|| encode(black_box(&varying)))
    });
    c.bench_function("gorilla_encode_constant", |b| {
        b.iter(|| encode(black_box(&constant)))
    });
    c.bench_function("gorilla_decode_varying", |b| {
        b.iter(|| decode(black_box(&varying_bytes), n))
    });
    c.bench_function("gorilla_decode_constant", |b| {
        b.iter(|| decode(black_box(&constant_bytes), n))
    });
}

criterion_group!(benches, bench_gorilla);
criterion_main!(benches);
