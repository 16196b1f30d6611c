use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mutrate::data::Sample;
use mutrate::RateEstimator;

fn solve_reference_samples(c: &mut Criterion) {
    let estimator = RateEstimator::default();
    let samples = [
        Sample::new("A", 10.0, 1_000_000.0),
        Sample::new("wild type", 2e-6, 1e8),
        Sample::new("mutator", 3.5e-4, 5e9),
    ];

    c.bench_function("estimate_reference_samples", |b| {
        b.iter(|| {
            for sample in &samples {
                black_box(estimator.evaluate(black_box(sample)));
            }
        })
    });
}

criterion_group!(benches, solve_reference_samples);
criterion_main!(benches);
