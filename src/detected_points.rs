use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Court keypoint candidates of one frame, index aligned with the reference layout.
///
/// A landmark is present only when both coordinates are strictly positive;
/// anything else (conventionally `(0, 0)`) means "not detected".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameLandmarks {
    pub points: Vec<Vec2>,
}

impl FrameLandmarks {
    pub fn new(points: Vec<Vec2>) -> FrameLandmarks {
        FrameLandmarks { points }
    }

    /// All `n` landmarks absent.
    pub fn absent(n: usize) -> FrameLandmarks {
        FrameLandmarks {
            points: vec![Vec2::ZERO; n],
        }
    }

    pub fn from_xy(xy: &[(f32, f32)]) -> FrameLandmarks {
        FrameLandmarks {
            points: xy.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_present(&self, idx: usize) -> bool {
        self.points.get(idx).is_some_and(|p| is_present(*p))
    }

    pub fn present_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| is_present(*p).then_some(i))
            .collect()
    }

    pub fn mark_absent(&mut self, idx: usize) {
        if let Some(p) = self.points.get_mut(idx) {
            *p = Vec2::ZERO;
        }
    }
}

/// `x > 0 && y > 0`; NaN and infinite coordinates count as absent.
pub fn is_present(p: Vec2) -> bool {
    p.is_finite() && p.x > 0.0 && p.y > 0.0
}

/// One tracked object in camera pixels, `bbox = [x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    pub bbox: [f32; 4],
}

/// Object id to tracked object for one frame.
pub type FrameTracks = BTreeMap<u32, TrackedObject>;

/// Everything the upstream detector and tracker hand over for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub landmarks: FrameLandmarks,
    #[serde(default)]
    pub tracks: FrameTracks,
}
