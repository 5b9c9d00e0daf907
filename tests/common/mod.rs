#![allow(dead_code)]

use glam::Vec2;
use nalgebra as na;
use tactical_view::{FrameLandmarks, ReferenceLayout};

/// A mild perspective camera mapping canvas pixels into the image.
pub fn court_to_image() -> na::Matrix3<f64> {
    na::Matrix3::new(2.0, 0.3, 100.0, 0.1, 1.5, 80.0, 0.0002, 0.0005, 1.0)
}

pub fn apply(h: &na::Matrix3<f64>, p: Vec2) -> Vec2 {
    let r = h * na::Vector3::new(p.x as f64, p.y as f64, 1.0);
    Vec2::new((r[0] / r[2]) as f32, (r[1] / r[2]) as f32)
}

/// Every reference landmark seen through `court_to_image`.
pub fn perspective_landmarks(layout: &ReferenceLayout) -> FrameLandmarks {
    let h = court_to_image();
    FrameLandmarks::new(
        layout
            .points()
            .iter()
            .map(|p| apply(&h, p.as_vec2()))
            .collect(),
    )
}

/// Keeps only the landmarks in `keep`, everything else absent.
pub fn keep_only(landmarks: &FrameLandmarks, keep: &[usize]) -> FrameLandmarks {
    FrameLandmarks::new(
        landmarks
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| if keep.contains(&i) { *p } else { Vec2::ZERO })
            .collect(),
    )
}
