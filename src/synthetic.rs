//! Synthetic frames for tests, benchmarks and the `frame-generator` binary.
//!
//! A random perspective camera maps the reference court into the image. Its
//! landmarks are jittered, some are dropped and some are moved far away to
//! exercise the validator.

use glam::Vec2;
use nalgebra as na;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::court::ReferenceLayout;
use crate::detected_points::{FrameInput, FrameLandmarks, FrameTracks, TrackedObject};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Bound of the uniform landmark jitter, in pixels.
    pub noise_px: f32,
    pub drop_probability: f64,
    pub outlier_probability: f64,
    pub players: usize,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            image_width: 1920,
            image_height: 1080,
            noise_px: 1.0,
            drop_probability: 0.2,
            outlier_probability: 0.05,
            players: 10,
        }
    }
}

/// One generated frame together with the camera that produced it.
pub struct SyntheticFrame {
    pub input: FrameInput,
    /// Canvas to image homography.
    pub court_to_image: na::Matrix3<f64>,
}

fn apply(h: &na::Matrix3<f64>, p: Vec2) -> Vec2 {
    let r = h * na::Vector3::new(p.x as f64, p.y as f64, 1.0);
    Vec2::new((r[0] / r[2]) as f32, (r[1] / r[2]) as f32)
}

/// A broadcast-like view: the canvas scaled to fill most of the image with a
/// mild random perspective tilt.
pub fn random_court_to_image<R: Rng>(
    layout: &ReferenceLayout,
    config: &SyntheticConfig,
    rng: &mut R,
) -> na::Matrix3<f64> {
    let cw = layout.config().canvas_width as f64;
    let ch = layout.config().canvas_height as f64;
    let iw = config.image_width as f64;
    let ih = config.image_height as f64;

    let scale_x: f64 = rng.random_range(0.9..1.1);
    let scale_y: f64 = rng.random_range(0.9..1.1);
    let shift_x: f64 = rng.random_range(-0.02..0.02);
    let shift_y: f64 = rng.random_range(-0.02..0.02);
    let shear: f64 = rng.random_range(-0.1..0.1);
    // far side line (y = 0) shrinks by up to 1.5x, near side keeps its scale
    let tilt: f64 = rng.random_range(0.0..0.5);
    let tilt_x: f64 = rng.random_range(-0.05..0.05f64) / cw;

    let sx = 0.7 * iw / cw * scale_x;
    let sy = 0.55 * ih / ch * scale_y;
    let tx = (0.15 + shift_x) * iw;
    let ty = (0.2 + shift_y) * ih;

    na::Matrix3::new(sx, shear * sx, tx, 0.0, sy, ty, tilt_x, -tilt / ch, 1.0 + tilt)
}

pub fn generate_frame<R: Rng>(
    layout: &ReferenceLayout,
    config: &SyntheticConfig,
    rng: &mut R,
) -> SyntheticFrame {
    let court_to_image = random_court_to_image(layout, config, rng);
    let in_image = |p: Vec2| {
        p.x > 0.0
            && p.y > 0.0
            && p.x < config.image_width as f32
            && p.y < config.image_height as f32
    };

    let points = layout
        .points()
        .iter()
        .map(|r| {
            if rng.random_bool(config.drop_probability.clamp(0.0, 1.0)) {
                return Vec2::ZERO;
            }
            let jx: f32 = rng.random_range(-1.0..=1.0);
            let jy: f32 = rng.random_range(-1.0..=1.0);
            let jitter = Vec2::new(jx, jy) * config.noise_px;
            let mut p = apply(&court_to_image, r.as_vec2()) + jitter;
            if rng.random_bool(config.outlier_probability.clamp(0.0, 1.0)) {
                p = Vec2::new(
                    rng.random_range(1.0..config.image_width as f32),
                    rng.random_range(1.0..config.image_height as f32),
                );
            }
            if in_image(p) { p } else { Vec2::ZERO }
        })
        .collect();

    let cw = layout.config().canvas_width as f32;
    let ch = layout.config().canvas_height as f32;
    let tracks: FrameTracks = (0..config.players as u32)
        .filter_map(|id| {
            let court_pos = Vec2::new(rng.random_range(0.0..cw), rng.random_range(0.0..ch));
            let foot = apply(&court_to_image, court_pos);
            let height = rng.random_range(80.0..160.0f32);
            let width = height * 0.4;
            in_image(foot).then(|| {
                (
                    id,
                    TrackedObject {
                        bbox: [foot.x - width / 2.0, foot.y - height, foot.x + width / 2.0, foot.y],
                    },
                )
            })
        })
        .collect();

    SyntheticFrame {
        input: FrameInput {
            landmarks: FrameLandmarks::new(points),
            tracks,
        },
        court_to_image,
    }
}

pub fn generate_frames<R: Rng>(
    layout: &ReferenceLayout,
    config: &SyntheticConfig,
    num_frames: usize,
    rng: &mut R,
) -> Vec<SyntheticFrame> {
    (0..num_frames)
        .map(|_| generate_frame(layout, config, rng))
        .collect()
}
