use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trailprof::geodesy::{cumulative_distances, distance};
use trailprof::sampling::sample;
use trailprof::{Coordinate, ElevationProfile};

/// A winding synthetic stream centerline.
fn stream(len: usize) -> Vec<Coordinate> {
    (0..len)
        .map(|i| {
            let t = i as f64 * 0.01;
            Coordinate::new(-105.3 + t * 0.01 + (t * 3.0).sin() * 0.002, 40.0 + t * 0.005)
        })
        .collect()
}

fn bench_distance(c: &mut Criterion) {
    let a = Coordinate::new(-105.2705, 40.0150);
    let b = Coordinate::new(-105.2600, 40.0230);

    c.bench_function("haversine_distance", |bench| {
        bench.iter(|| black_box(distance(black_box(a), black_box(b))))
    });
}

fn bench_cumulative(c: &mut Criterion) {
    let path = stream(10_000);

    c.bench_function("cumulative_distances_10k", |b| {
        b.iter(|| black_box(cumulative_distances(black_box(&path))))
    });
}

fn bench_sample(c: &mut Criterion) {
    let path = stream(10_000);

    c.bench_function("sample_10k_to_50", |b| {
        b.iter(|| black_box(sample(black_box(&path), 50)))
    });
}

fn bench_from_parts(c: &mut Criterion) {
    let path = sample(&stream(10_000), 50);
    let elevations: Vec<f64> = (0..path.len()).map(|i| 1600.0 + (i % 7) as f64).collect();

    c.bench_function("profile_from_parts_50", |b| {
        b.iter(|| black_box(ElevationProfile::from_parts(black_box(&path), black_box(&elevations)).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_distance,
    bench_cumulative,
    bench_sample,
    bench_from_parts
);
criterion_main!(benches);
