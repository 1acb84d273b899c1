use criterion::{black_box, BenchmarkId};
use criterion::{criterion_group, criterion_main, Criterion};
use nigfit::rv::traits::Rv;
use nigfit::{Loss, NigParams, Objective};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn bench_sample(c: &mut Criterion) {
    let nig = NigParams::new(0.0, 0.5, 1.0, 0.5).unwrap();
    c.bench_function("NIG 10k draws", |b| {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        b.iter(|| {
            let xs: Vec<(f64, f64)> = nig.sample(10_000, &mut rng);
            black_box(xs)
        })
    });
}

fn bench_losses(c: &mut Criterion) {
    let mut group = c.benchmark_group("Objective eval");
    let theta = [0.0, 0.5, 1.0, 0.5];

    for loss in [Loss::Moments, Loss::Elementwise, Loss::Quantile] {
        let objective = Objective::new(loss);
        let id = BenchmarkId::new("loss", loss);
        group.bench_with_input(id, &objective, |b, objective| {
            let mut rng = Xoshiro256Plus::seed_from_u64(1337);
            b.iter(|| black_box(objective.eval(&theta, &mut rng)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sample, bench_losses);
criterion_main!(benches);
