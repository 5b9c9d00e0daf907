use glam::Vec2;
use log::debug;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::homography::{Homography, fit_homography};

const SAMPLE_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacConfig {
    pub max_iterations: usize,
    /// Inlier threshold on the reprojection error, in canvas pixels.
    pub inlier_threshold: f64,
    /// Fixed seed keeps the estimate identical across runs.
    pub seed: u64,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            inlier_threshold: 5.0,
            seed: 0,
        }
    }
}

pub fn ransac_homography(
    src: &[Vec2],
    dst: &[Vec2],
    config: &RansacConfig,
    refine_iterations: usize,
) -> Option<Homography> {
    if src.len() != dst.len() || src.len() < SAMPLE_SIZE {
        return None;
    }
    if src.len() == SAMPLE_SIZE {
        return fit_homography(src, dst, refine_iterations);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut nums: Vec<usize> = (0..src.len()).collect();
    let mut best_inliers: Vec<usize> = Vec::new();
    let mut best_error = f64::MAX;

    for _ in 0..config.max_iterations {
        nums.shuffle(&mut rng);
        let sample_src: Vec<_> = nums[..SAMPLE_SIZE].iter().map(|&i| src[i]).collect();
        let sample_dst: Vec<_> = nums[..SAMPLE_SIZE].iter().map(|&i| dst[i]).collect();
        let Some(h) = fit_homography(&sample_src, &sample_dst, 0) else {
            continue;
        };

        let errors = h.reprojection_errors(src, dst);
        let inliers: Vec<usize> = errors
            .iter()
            .enumerate()
            .filter_map(|(i, e)| (*e <= config.inlier_threshold).then_some(i))
            .collect();
        let inlier_error: f64 = inliers.iter().map(|&i| errors[i]).sum();
        if inliers.len() > best_inliers.len()
            || (inliers.len() == best_inliers.len() && inlier_error < best_error)
        {
            best_error = inlier_error;
            best_inliers = inliers;
            if best_inliers.len() == src.len() {
                break;
            }
        }
    }

    if best_inliers.len() < SAMPLE_SIZE {
        debug!("ransac found {} inliers", best_inliers.len());
        return None;
    }
    debug!("ransac kept {} of {} correspondences", best_inliers.len(), src.len());
    let inlier_src: Vec<_> = best_inliers.iter().map(|&i| src[i]).collect();
    let inlier_dst: Vec<_> = best_inliers.iter().map(|&i| dst[i]).collect();
    fit_homography(&inlier_src, &inlier_dst, refine_iterations)
}
