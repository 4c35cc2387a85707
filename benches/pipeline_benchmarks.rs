//! Performance benchmarks for the recognition pipeline components

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use asl_recognition::{
    cascade::CascadeController,
    classifier::Prediction,
    features,
    landmarks::{HandLandmarks, Landmark, LandmarkSet},
    scaler::FeatureScaler,
};

fn synthetic_hand() -> HandLandmarks {
    let image: Vec<Landmark> = (0..21)
        .map(|i| {
            let t = i as f32 / 20.0;
            Landmark::new(0.3 + 0.4 * t, 0.3 + 0.4 * (1.0 - t), 0.0)
        })
        .collect();
    let world: Vec<Landmark> = (0..21)
        .map(|i| Landmark::new((i as f32 * 0.7).sin(), (i as f32 * 0.3).cos(), i as f32 * 0.05))
        .collect();
    HandLandmarks {
        image: LandmarkSet::new(image).unwrap(),
        world: LandmarkSet::new(world).unwrap(),
    }
}

/// Benchmark geometric feature derivation
fn bench_feature_extraction(c: &mut Criterion) {
    let hand = synthetic_hand();

    c.bench_function("joint_angles", |b| {
        b.iter(|| features::joint_angles(black_box(&hand.world)));
    });

    c.bench_function("tip_distances", |b| {
        b.iter(|| features::tip_distances(black_box(&hand.world)));
    });

    c.bench_function("extract_full_vector", |b| {
        b.iter(|| features::extract(black_box(&hand), 640, 480).unwrap());
    });
}

/// Benchmark the scaler transform over a full feature vector
fn bench_scaler(c: &mut Criterion) {
    let scaler = FeatureScaler::new(vec![0.5; 79], vec![2.0; 79]).unwrap();
    let features: Vec<f32> = (0..79).map(|i| i as f32 * 0.1).collect();

    c.bench_function("scaler_transform", |b| {
        b.iter(|| scaler.transform(black_box(&features)).unwrap());
    });
}

/// Benchmark cascade routing decisions
fn bench_cascade_routing(c: &mut Criterion) {
    let cascade = CascadeController::default();
    let predictions = [
        Prediction { label: 'S', confidence: 0.6 },
        Prediction { label: 'B', confidence: 0.95 },
        Prediction { label: 'L', confidence: 0.3 },
        Prediction { label: 'W', confidence: 0.5 },
    ];

    c.bench_function("cascade_route", |b| {
        b.iter(|| {
            for prediction in &predictions {
                black_box(cascade.route(black_box(prediction)));
            }
        });
    });
}

criterion_group!(benches, bench_feature_extraction, bench_scaler, bench_cascade_routing);
criterion_main!(benches);
