use serde::{Deserialize, Serialize};

use crate::detected_points::FrameLandmarks;
use crate::projection::ProjectedPositions;

/// Result of running one frame through validate, estimate and project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub frame_index: usize,
    /// Landmarks after validation, rejected ones zeroed.
    pub landmarks: FrameLandmarks,
    pub invalidated: Vec<usize>,
    pub homography: Option<[[f64; 3]; 3]>,
    /// Reprojection RMS of the landmarks used for the fit, in canvas pixels.
    pub reprojection_rms: Option<f64>,
    pub positions: ProjectedPositions,
}

impl FrameOutput {
    pub fn has_homography(&self) -> bool {
        self.homography.is_some()
    }
}
