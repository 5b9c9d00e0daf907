use glam::Vec2;
use log::debug;
use nalgebra as na;
use serde::{Deserialize, Serialize};

use super::ransac::{RansacConfig, ransac_homography};
use super::refine::refine_homography;
use crate::court::ReferenceLayout;
use crate::detected_points::FrameLandmarks;
use crate::error::{Result, TacticalViewError};

const MIN_CORRESPONDENCES: usize = 4;
const NORM_EPS: f64 = 1e-12;
const RANK_EPS: f64 = 1e-12;
const DET_EPS: f64 = 1e-8;
const W_EPS: f64 = 1e-12;

/// Camera image to top-down canvas mapping of a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    mat: na::Matrix3<f64>,
}

impl Homography {
    /// Scales `mat` so that `h22 == 1` when possible. Non-finite or singular
    /// matrices are rejected.
    pub fn from_matrix(mat: na::Matrix3<f64>) -> Option<Homography> {
        if mat.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let scale = if mat[(2, 2)].abs() > NORM_EPS {
            mat[(2, 2)]
        } else {
            mat.norm()
        };
        if scale.abs() <= NORM_EPS {
            return None;
        }
        let mat = mat / scale;
        let det = mat.determinant();
        if !det.is_finite() || det == 0.0 {
            return None;
        }
        Some(Homography { mat })
    }

    pub fn identity() -> Homography {
        Homography {
            mat: na::Matrix3::identity(),
        }
    }

    pub fn matrix(&self) -> &na::Matrix3<f64> {
        &self.mat
    }

    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        let m = &self.mat;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    /// `None` when the point lands on the line at infinity.
    pub fn transform_point(&self, p: Vec2) -> Option<Vec2> {
        let r = self.mat * na::Vector3::new(p.x as f64, p.y as f64, 1.0);
        if !r[2].is_finite() || r[2].abs() < W_EPS {
            return None;
        }
        let out = Vec2::new((r[0] / r[2]) as f32, (r[1] / r[2]) as f32);
        out.is_finite().then_some(out)
    }

    pub fn transform_points(&self, pts: &[Vec2]) -> Vec<Option<Vec2>> {
        pts.iter().map(|p| self.transform_point(*p)).collect()
    }

    /// Per-correspondence distance between `H * src` and `dst`, infinite for
    /// points that cannot be projected.
    pub fn reprojection_errors(&self, src: &[Vec2], dst: &[Vec2]) -> Vec<f64> {
        src.iter()
            .zip(dst)
            .map(|(s, d)| match self.transform_point(*s) {
                Some(p) => crate::util::measure_distance(p, *d),
                None => f64::INFINITY,
            })
            .collect()
    }

    pub fn reprojection_rms(&self, src: &[Vec2], dst: &[Vec2]) -> f64 {
        let errors = self.reprojection_errors(src, dst);
        if errors.is_empty() {
            return 0.0;
        }
        (errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64).sqrt()
    }
}

/// Translates the centroid to the origin and scales the mean distance to sqrt(2).
///
/// `None` when all points coincide.
pub(crate) fn normalize_points(pts: &[Vec2]) -> Option<(na::Matrix3<f64>, Vec<na::Vector2<f64>>)> {
    let n = pts.len() as f64;
    let cx = pts.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let cy = pts.iter().map(|p| p.y as f64).sum::<f64>() / n;
    let mean_dist = pts
        .iter()
        .map(|p| ((p.x as f64 - cx).powi(2) + (p.y as f64 - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    if !mean_dist.is_finite() || mean_dist <= NORM_EPS {
        return None;
    }
    let s = std::f64::consts::SQRT_2 / mean_dist;
    let t = na::Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);
    let normalized = pts
        .iter()
        .map(|p| na::Vector2::new(s * (p.x as f64 - cx), s * (p.y as f64 - cy)))
        .collect();
    Some((t, normalized))
}

/// Direct linear transform on normalized correspondences.
///
/// The solution is the eigenvector of the smallest eigenvalue of `A^T A`.
/// Rank deficient systems and singular solutions return `None`.
pub(crate) fn dlt_normalized(
    src: &[na::Vector2<f64>],
    dst: &[na::Vector2<f64>],
) -> Option<na::Matrix3<f64>> {
    let mut ata = na::SMatrix::<f64, 9, 9>::zeros();
    for (s, d) in src.iter().zip(dst) {
        let (x, y) = (s.x, s.y);
        let (u, v) = (d.x, d.y);
        let r0 = na::SVector::<f64, 9>::from_column_slice(&[
            x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y, -u,
        ]);
        let r1 = na::SVector::<f64, 9>::from_column_slice(&[
            0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y, -v,
        ]);
        ata += r0 * r0.transpose() + r1 * r1.transpose();
    }

    let eig = na::SymmetricEigen::new(ata);
    let mut order: Vec<usize> = (0..9).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[a].abs().total_cmp(&eig.eigenvalues[b].abs()));
    let smallest = eig.eigenvalues[order[0]].abs();
    let second = eig.eigenvalues[order[1]].abs();
    let largest = eig.eigenvalues[order[8]].abs();
    if !largest.is_finite() || largest <= 0.0 || second <= RANK_EPS * largest {
        debug!(
            "degenerate correspondences, eigenvalues {:e} {:e} {:e}",
            smallest, second, largest
        );
        return None;
    }

    let h = eig.eigenvectors.column(order[0]);
    let h_norm = na::Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], h[8]);
    if h_norm.determinant().abs() < DET_EPS {
        debug!("singular homography, det {:e}", h_norm.determinant());
        return None;
    }
    Some(h_norm)
}

/// Least-squares fit of a homography mapping `src` onto `dst`.
///
/// Exactly four correspondences are solved exactly. With more, the algebraic
/// DLT solution is refined for `refine_iterations` Gauss-Newton steps on the
/// reprojection error.
pub fn fit_homography(src: &[Vec2], dst: &[Vec2], refine_iterations: usize) -> Option<Homography> {
    if src.len() != dst.len() || src.len() < MIN_CORRESPONDENCES {
        return None;
    }
    let (t_src, src_n) = normalize_points(src)?;
    let (t_dst, dst_n) = normalize_points(dst)?;

    let mut h_norm = dlt_normalized(&src_n, &dst_n)?;
    if src.len() > MIN_CORRESPONDENCES && refine_iterations > 0 {
        h_norm = refine_homography(&h_norm, &src_n, &dst_n, refine_iterations);
    }

    let t_dst_inv = t_dst.try_inverse()?;
    Homography::from_matrix(t_dst_inv * h_norm * t_src)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomographyMethod {
    /// Fit on every correspondence.
    #[default]
    LeastSquares,
    /// Seeded RANSAC over 4-point samples, then a least-squares refit on inliers.
    Ransac,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomographyConfig {
    pub method: HomographyMethod,
    pub refine_iterations: usize,
    pub ransac: RansacConfig,
}

impl Default for HomographyConfig {
    fn default() -> Self {
        Self {
            method: HomographyMethod::LeastSquares,
            refine_iterations: 10,
            ransac: RansacConfig::default(),
        }
    }
}

pub fn estimate_homography(
    src: &[Vec2],
    dst: &[Vec2],
    config: &HomographyConfig,
) -> Option<Homography> {
    match config.method {
        HomographyMethod::LeastSquares => fit_homography(src, dst, config.refine_iterations),
        HomographyMethod::Ransac => {
            ransac_homography(src, dst, &config.ransac, config.refine_iterations)
        }
    }
}

/// Image-space landmarks and their reference counterparts at every present index.
pub fn landmark_correspondences(
    landmarks: &FrameLandmarks,
    layout: &ReferenceLayout,
) -> (Vec<Vec2>, Vec<Vec2>) {
    landmarks
        .present_indices()
        .into_iter()
        .filter_map(|i| layout.point(i).map(|r| (landmarks.points[i], r)))
        .unzip()
}

pub struct HomographyEstimator<'a> {
    layout: &'a ReferenceLayout,
    config: HomographyConfig,
}

impl<'a> HomographyEstimator<'a> {
    pub fn new(layout: &'a ReferenceLayout, config: HomographyConfig) -> HomographyEstimator<'a> {
        HomographyEstimator { layout, config }
    }

    pub fn config(&self) -> &HomographyConfig {
        &self.config
    }

    /// `Ok(None)` when fewer than four landmarks are present or the fit is degenerate.
    pub fn estimate(&self, landmarks: &FrameLandmarks) -> Result<Option<Homography>> {
        if landmarks.len() != self.layout.len() {
            return Err(TacticalViewError::LandmarkCountMismatch {
                expected: self.layout.len(),
                got: landmarks.len(),
            });
        }
        let (src, dst) = landmark_correspondences(landmarks, self.layout);
        if src.len() < MIN_CORRESPONDENCES {
            debug!("{} valid landmarks, need {}", src.len(), MIN_CORRESPONDENCES);
            return Ok(None);
        }
        Ok(estimate_homography(&src, &dst, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_points_have_unit_scale() {
        let pts = [
            Vec2::new(10.0, 10.0),
            Vec2::new(30.0, 10.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(10.0, 30.0),
        ];
        let (t, normalized) = normalize_points(&pts).unwrap();
        let cx: f64 = normalized.iter().map(|p| p.x).sum();
        let cy: f64 = normalized.iter().map(|p| p.y).sum();
        assert!(cx.abs() < 1e-12 && cy.abs() < 1e-12);
        let mean: f64 = normalized.iter().map(|p| p.norm()).sum::<f64>() / 4.0;
        assert!((mean - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert!((t[(0, 0)] - std::f64::consts::SQRT_2 / (200.0f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn coincident_points_cannot_be_normalized() {
        let pts = [Vec2::new(5.0, 5.0); 4];
        assert!(normalize_points(&pts).is_none());
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let src: Vec<_> = (1..=5).map(|i| na::Vector2::new(i as f64, 2.0 * i as f64)).collect();
        let dst = src.clone();
        assert!(dlt_normalized(&src, &dst).is_none());
    }

    #[test]
    fn point_at_infinity_is_not_projected() {
        let h = Homography::from_matrix(na::Matrix3::new(
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0,
        ))
        .unwrap();
        assert!(h.transform_point(Vec2::new(-1.0, 3.0)).is_none());
        let p = h.transform_point(Vec2::new(1.0, 4.0)).unwrap();
        assert!((p - Vec2::new(0.5, 2.0)).length() < 1e-6);
    }
}
