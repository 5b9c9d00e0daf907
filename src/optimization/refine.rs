use faer::linalg::solvers::SolveLstsqCore;
use log::trace;
use nalgebra as na;

const STEP_EPS: f64 = 1e-12;
const H22_EPS: f64 = 1e-8;

fn project(h: &[f64; 8], p: &na::Vector2<f64>) -> Option<(f64, f64, f64)> {
    let w = h[6] * p.x + h[7] * p.y + 1.0;
    if !w.is_finite() || w.abs() < STEP_EPS {
        return None;
    }
    let u = (h[0] * p.x + h[1] * p.y + h[2]) / w;
    let v = (h[3] * p.x + h[4] * p.y + h[5]) / w;
    Some((u, v, w))
}

fn sum_squared_error(
    h: &[f64; 8],
    src: &[na::Vector2<f64>],
    dst: &[na::Vector2<f64>],
) -> Option<f64> {
    let mut sum = 0.0;
    for (s, d) in src.iter().zip(dst) {
        let (u, v, _) = project(h, s)?;
        sum += (u - d.x).powi(2) + (v - d.y).powi(2);
    }
    sum.is_finite().then_some(sum)
}

/// Gauss-Newton minimization of the reprojection error of `h_init`, with
/// `h22` fixed to one. Each step is a dense QR least-squares solve.
///
/// Steps that do not reduce the error are discarded, so the result is never
/// worse than `h_init`.
pub fn refine_homography(
    h_init: &na::Matrix3<f64>,
    src: &[na::Vector2<f64>],
    dst: &[na::Vector2<f64>],
    iterations: usize,
) -> na::Matrix3<f64> {
    if h_init[(2, 2)].abs() < H22_EPS {
        return *h_init;
    }
    let scaled = h_init / h_init[(2, 2)];
    let mut h = [
        scaled[(0, 0)],
        scaled[(0, 1)],
        scaled[(0, 2)],
        scaled[(1, 0)],
        scaled[(1, 1)],
        scaled[(1, 2)],
        scaled[(2, 0)],
        scaled[(2, 1)],
    ];
    let Some(mut best_error) = sum_squared_error(&h, src, dst) else {
        return *h_init;
    };

    let n = src.len();
    for iteration in 0..iterations {
        let mut rows: Vec<[f64; 8]> = Vec::with_capacity(2 * n);
        let mut residuals: Vec<f64> = Vec::with_capacity(2 * n);
        for (s, d) in src.iter().zip(dst) {
            let Some((u, v, w)) = project(&h, s) else {
                return *h_init;
            };
            let (x, y) = (s.x, s.y);
            rows.push([x / w, y / w, 1.0 / w, 0.0, 0.0, 0.0, -u * x / w, -u * y / w]);
            rows.push([0.0, 0.0, 0.0, x / w, y / w, 1.0 / w, -v * x / w, -v * y / w]);
            residuals.push(d.x - u);
            residuals.push(d.y - v);
        }

        let jac = faer::Mat::<f64>::from_fn(2 * n, 8, |r, c| rows[r][c]);
        let mut step = faer::Mat::<f64>::from_fn(2 * n, 1, |r, _| residuals[r]);
        jac.qr()
            .solve_lstsq_in_place_with_conj(faer::Conj::No, step.as_mut());

        let mut candidate = h;
        let mut step_norm = 0.0;
        for (i, value) in candidate.iter_mut().enumerate() {
            let delta = *step.get(i, 0);
            *value += delta;
            step_norm += delta * delta;
        }
        if !step_norm.is_finite() {
            break;
        }

        match sum_squared_error(&candidate, src, dst) {
            Some(error) if error < best_error => {
                trace!("gauss-newton iteration {}: error {:e}", iteration, error);
                h = candidate;
                best_error = error;
            }
            _ => break,
        }
        if step_norm.sqrt() < STEP_EPS {
            break;
        }
    }

    na::Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0)
}
