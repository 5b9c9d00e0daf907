mod common;

use glam::{IVec2, Vec2};
use tactical_view::court::{CourtConfig, ReferenceLayout, create_default_basketball_court};
use tactical_view::{FrameLandmarks, LandmarkValidator, TacticalViewError, ValidatorConfig};

fn square_layout() -> ReferenceLayout {
    ReferenceLayout::new(
        vec![
            IVec2::new(0, 0),
            IVec2::new(10, 0),
            IVec2::new(0, 10),
            IVec2::new(10, 10),
            IVec2::new(20, 20),
        ],
        CourtConfig::default(),
    )
}

/// Reference points shifted by (100, 100), with landmark 0 moved next to
/// landmark 2 so that d01 / d02 is ~13x the reference ratio.
fn corrupted_square() -> FrameLandmarks {
    let mut landmarks = FrameLandmarks::new(
        square_layout()
            .points()
            .iter()
            .map(|p| p.as_vec2() + Vec2::splat(100.0))
            .collect(),
    );
    landmarks.points[0] = Vec2::new(100.0, 109.0);
    landmarks
}

#[test]
fn test_fewer_than_three_present_is_unchanged() {
    let layout = create_default_basketball_court();
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());

    let mut landmarks = FrameLandmarks::absent(layout.len());
    landmarks.points[0] = Vec2::new(5.0, 5.0);
    landmarks.points[10] = Vec2::new(6.0, 5000.0);

    let (corrected, report) = validator.validate_with_report(&landmarks).unwrap();
    assert_eq!(corrected, landmarks);
    assert!(report.invalidated.is_empty());
}

#[test]
fn test_three_present_cannot_be_checked() {
    let layout = create_default_basketball_court();
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());

    // wildly inconsistent, but every landmark has only two others to compare with
    let mut landmarks = FrameLandmarks::absent(layout.len());
    landmarks.points[0] = Vec2::new(5.0, 5.0);
    landmarks.points[5] = Vec2::new(6.0, 5.0);
    landmarks.points[10] = Vec2::new(900.0, 900.0);

    let corrected = validator.validate(&landmarks).unwrap();
    assert_eq!(corrected, landmarks);
}

#[test]
fn test_outlier_is_zeroed() {
    let layout = square_layout();
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());
    let landmarks = corrupted_square();

    let (corrected, report) = validator.validate_with_report(&landmarks).unwrap();
    assert_eq!(report.invalidated, vec![0]);
    assert_eq!(corrected.points[0], Vec2::ZERO);
    for i in 1..5 {
        assert_eq!(corrected.points[i], landmarks.points[i]);
    }
    // input untouched
    assert_eq!(landmarks.points[0], Vec2::new(100.0, 109.0));
}

#[test]
fn test_validation_is_idempotent() {
    let layout = square_layout();
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());

    let once = validator.validate(&corrupted_square()).unwrap();
    let (twice, report) = validator.validate_with_report(&once).unwrap();
    assert_eq!(once, twice);
    assert!(report.invalidated.is_empty());

    let court = create_default_basketball_court();
    let court_validator = LandmarkValidator::new(&court, ValidatorConfig::default());
    let once = court_validator
        .validate(&common::perspective_landmarks(&court))
        .unwrap();
    let twice = court_validator.validate(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_consistent_perspective_frame_is_kept() {
    let layout = create_default_basketball_court();
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());
    let landmarks = common::perspective_landmarks(&layout);

    let (corrected, report) = validator.validate_with_report(&landmarks).unwrap();
    assert!(report.invalidated.is_empty());
    assert_eq!(corrected, landmarks);
}

#[test]
fn test_coincident_comparison_point_is_rejected() {
    let layout = square_layout();
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());

    // landmark 0 sits on top of landmark 2, so d02 == 0 and the ratio is infinite
    let landmarks = FrameLandmarks::from_xy(&[
        (100.0, 110.0),
        (110.0, 100.0),
        (100.0, 110.0),
        (110.0, 110.0),
        (120.0, 120.0),
    ]);
    let (corrected, report) = validator.validate_with_report(&landmarks).unwrap();
    assert_eq!(report.invalidated, vec![0]);
    assert!(!corrected.is_present(0));
}

#[test]
fn test_zero_reference_distance_is_skipped() {
    let layout = ReferenceLayout::new(
        vec![
            IVec2::new(5, 5),
            IVec2::new(5, 5),
            IVec2::new(0, 10),
            IVec2::new(10, 10),
        ],
        CourtConfig::default(),
    );
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());
    let landmarks = FrameLandmarks::from_xy(&[
        (100.0, 100.0),
        (500.0, 500.0),
        (100.0, 110.0),
        (110.0, 110.0),
    ]);

    let report = validator.validate_with_report(&landmarks).unwrap().1;
    assert!(!report.invalidated.contains(&0));
    assert!(!report.invalidated.contains(&1));
}

#[test]
fn test_threshold_is_configurable() {
    let layout = square_layout();
    let lenient = LandmarkValidator::new(
        &layout,
        ValidatorConfig {
            relative_error_threshold: 100.0,
        },
    );
    let landmarks = corrupted_square();
    assert_eq!(lenient.validate(&landmarks).unwrap(), landmarks);
}

#[test]
fn test_validation_is_deterministic() {
    let layout = square_layout();
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());
    let a = validator.validate_with_report(&corrupted_square()).unwrap();
    let b = validator.validate_with_report(&corrupted_square()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_landmark_count_mismatch_is_an_error() {
    let layout = create_default_basketball_court();
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());
    let result = validator.validate(&FrameLandmarks::absent(17));
    assert!(matches!(
        result,
        Err(TacticalViewError::LandmarkCountMismatch {
            expected: 18,
            got: 17
        })
    ));
}

#[test]
fn test_all_absent_degrades_gracefully() {
    let layout = create_default_basketball_court();
    let validator = LandmarkValidator::new(&layout, ValidatorConfig::default());
    let landmarks = FrameLandmarks::absent(layout.len());
    assert_eq!(validator.validate(&landmarks).unwrap(), landmarks);
}
