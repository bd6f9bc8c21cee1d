use criterion::{criterion_group, criterion_main};

fn erode_benchmarks(c: &mut criterion::Criterion) {
    morphium::bench::erode::bench_erode(c);
}

criterion_group!(benches, erode_benchmarks);
criterion_main!(benches);
