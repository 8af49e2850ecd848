use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docdiff_benches::available_corpora;
use docdiff_core::diff::{classify, compute_matching};
use docdiff_core::CompareOptions;

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");
    for corpus in available_corpora() {
        let dataset = corpus.load();
        group.throughput(Throughput::Bytes(corpus.fixture_bytes() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(corpus.name()), &dataset, |b, dataset| {
            b.iter(|| {
                let canonical = dataset.canonicalize().expect("corpus canonicalizes");
                black_box(canonical);
            });
        });
    }
    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");
    for corpus in available_corpora() {
        let (before, after) = corpus.load().canonicalize().expect("corpus canonicalizes");
        let a: Vec<&str> = before.split('\n').collect();
        let b: Vec<&str> = after.split('\n').collect();
        group.throughput(Throughput::Elements((a.len() + b.len()) as u64));
        group.bench_function(corpus.name(), |bench| {
            bench.iter(|| {
                let matching = compute_matching(&a, &b);
                black_box(classify(&a, &b, &matching));
            });
        });
    }
    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    let options = CompareOptions::default();
    for corpus in available_corpora() {
        let dataset = corpus.load();
        group.throughput(Throughput::Bytes(corpus.fixture_bytes() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(corpus.name()), &dataset, |b, dataset| {
            b.iter(|| {
                let result = dataset.compare(&options);
                black_box(result);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_canonicalize, bench_matching, bench_compare);
criterion_main!(benches);
