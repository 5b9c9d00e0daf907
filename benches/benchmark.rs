use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use tactical_view::synthetic::{SyntheticConfig, generate_frames};
use tactical_view::{
    FrameInput, HomographyConfig, HomographyEstimator, HomographyMethod, LandmarkValidator,
    ReferenceLayout, TacticalViewConverter, ValidatorConfig,
};

fn synthetic_inputs(layout: &ReferenceLayout, num_frames: usize) -> Vec<FrameInput> {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    generate_frames(layout, &SyntheticConfig::default(), num_frames, &mut rng)
        .into_iter()
        .map(|f| f.input)
        .collect()
}

fn bench_validate(c: &mut Criterion) {
    let layout = ReferenceLayout::default();
    let frame = synthetic_inputs(&layout, 1).remove(0);
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());

    c.bench_function("validate_landmarks", |b| {
        b.iter(|| validator.validate(black_box(&frame.landmarks)))
    });
}

fn bench_estimate(c: &mut Criterion) {
    let layout = ReferenceLayout::default();
    let frame = synthetic_inputs(&layout, 1).remove(0);

    for (name, method) in [
        ("estimate_homography_lstsq", HomographyMethod::LeastSquares),
        ("estimate_homography_ransac", HomographyMethod::Ransac),
    ] {
        let config = HomographyConfig {
            method,
            ..Default::default()
        };
        let estimator = HomographyEstimator::new(&layout, config);
        c.bench_function(name, |b| {
            b.iter(|| estimator.estimate(black_box(&frame.landmarks)))
        });
    }
}

fn bench_process_frames(c: &mut Criterion) {
    let layout = ReferenceLayout::default();
    let inputs = synthetic_inputs(&layout, 200);
    let converter = TacticalViewConverter::default();

    c.bench_function("process_200_frames", |b| {
        b.iter(|| converter.process_frames(black_box(&inputs)))
    });
}

criterion_group!(benches, bench_validate, bench_estimate, bench_process_frames);
criterion_main!(benches);
