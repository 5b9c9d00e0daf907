//! Geometric consistency check of detected court landmarks.
//!
//! Each present landmark `i` is compared against the two lowest-index
//! landmarks still trusted in the same pass. The ratio of the detected
//! distances `|i - j| / |i - k|` must agree with the same ratio on the
//! reference layout within a relative error, otherwise `i` is zeroed.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::court::ReferenceLayout;
use crate::detected_points::FrameLandmarks;
use crate::error::{Result, TacticalViewError};
use crate::util::measure_distance;

const MIN_PRESENT: usize = 3;
const MIN_CANDIDATES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// A landmark whose distance ratio deviates more than this from the
    /// reference ratio is rejected.
    pub relative_error_threshold: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            relative_error_threshold: 0.8,
        }
    }
}

/// Indices zeroed by one validation pass, in the order they were rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub invalidated: Vec<usize>,
}

pub struct LandmarkValidator<'a> {
    layout: &'a ReferenceLayout,
    config: ValidatorConfig,
}

impl<'a> LandmarkValidator<'a> {
    pub fn new(layout: &'a ReferenceLayout, config: ValidatorConfig) -> LandmarkValidator<'a> {
        LandmarkValidator { layout, config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Returns a corrected copy of `frame_landmarks`.
    pub fn validate(&self, frame_landmarks: &FrameLandmarks) -> Result<FrameLandmarks> {
        self.validate_with_report(frame_landmarks)
            .map(|(landmarks, _)| landmarks)
    }

    pub fn validate_with_report(
        &self,
        frame_landmarks: &FrameLandmarks,
    ) -> Result<(FrameLandmarks, ValidationReport)> {
        if frame_landmarks.len() != self.layout.len() {
            return Err(TacticalViewError::LandmarkCountMismatch {
                expected: self.layout.len(),
                got: frame_landmarks.len(),
            });
        }

        let mut corrected = frame_landmarks.clone();
        let mut report = ValidationReport::default();

        let detected_indices = frame_landmarks.present_indices();
        if detected_indices.len() < MIN_PRESENT {
            debug!(
                "only {} landmarks present, skip validation",
                detected_indices.len()
            );
            return Ok((corrected, report));
        }

        let detected = &frame_landmarks.points;
        for &i in &detected_indices {
            if report.invalidated.contains(&i) {
                continue;
            }
            let other_indices: Vec<usize> = detected_indices
                .iter()
                .copied()
                .filter(|idx| *idx != i && !report.invalidated.contains(idx))
                .collect();
            if other_indices.len() < MIN_CANDIDATES {
                continue;
            }
            let (j, k) = (other_indices[0], other_indices[1]);

            let d_ij = measure_distance(detected[i], detected[j]);
            let d_ik = measure_distance(detected[i], detected[k]);

            let reference = self.layout.points();
            let t_ij = measure_distance(reference[i].as_vec2(), reference[j].as_vec2());
            let t_ik = measure_distance(reference[i].as_vec2(), reference[k].as_vec2());

            if t_ij <= 0.0 || t_ik <= 0.0 {
                continue;
            }

            let prop_detected = if d_ik > 0.0 { d_ij / d_ik } else { f64::INFINITY };
            let prop_reference = t_ij / t_ik;
            let error = ((prop_detected - prop_reference) / prop_reference).abs();

            if error > self.config.relative_error_threshold {
                debug!(
                    "landmark {} rejected against ({}, {}), relative error {:.3}",
                    i, j, k, error
                );
                corrected.mark_absent(i);
                report.invalidated.push(i);
            }
        }

        Ok((corrected, report))
    }
}
