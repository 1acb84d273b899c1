use log::debug;
use nigfit_consts::{BFGS_GTOL, ITERS_PER_DIM};
use nigfit_utils::inf_norm;
use serde::{Deserialize, Serialize};

use super::{finite_or_inf, OptimizeResult};

/// BFGS tuning
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct BfgsParams {
    /// Stop when the infinity norm of the gradient falls below this
    pub gtol: f64,
    /// Relative step size of the forward-difference gradient
    pub eps: f64,
    /// Sufficient decrease constant of the Armijo line search
    pub c1: f64,
    /// Maximum number of step halvings per line search
    pub max_backtracks: usize,
    /// Maximum number of iterations. Defaults to 200 times the dimension.
    pub max_iters: Option<usize>,
}

impl Default for BfgsParams {
    fn default() -> Self {
        BfgsParams {
            gtol: BFGS_GTOL,
            eps: f64::EPSILON.sqrt(),
            c1: 1E-4,
            max_backtracks: 30,
            max_iters: None,
        }
    }
}

#[inline]
fn dot(xs: &[f64], ys: &[f64]) -> f64 {
    xs.iter().zip(ys.iter()).fold(0.0, |acc, (x, y)| x.mul_add(*y, acc))
}

#[inline]
fn mat_vec(mat: &[Vec<f64>], xs: &[f64]) -> Vec<f64> {
    mat.iter().map(|row| dot(row, xs)).collect()
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Forward-difference gradient of `f` at `x`, given `fx = f(x)`
fn fd_gradient<F>(
    f: &mut F,
    x: &[f64],
    fx: f64,
    eps: f64,
    n_evals: &mut usize,
) -> Vec<f64>
where
    F: FnMut(&[f64]) -> f64,
{
    let mut xh = x.to_vec();
    (0..x.len())
        .map(|i| {
            let h = eps * x[i].abs().max(1.0);
            xh[i] = x[i] + h;
            *n_evals += 1;
            let fh = f(&xh);
            xh[i] = x[i];
            (fh - fx) / h
        })
        .collect()
}

/// Inverse Hessian update. Skipped when the curvature condition fails so the
/// approximation stays positive definite.
fn bfgs_update(h_inv: &mut [Vec<f64>], s: &[f64], y: &[f64]) -> bool {
    let ys = dot(y, s);
    if ys <= 1E-12 || !ys.is_finite() {
        return false;
    }
    let rho = ys.recip();
    let hy = mat_vec(h_inv, y);
    let yhy = dot(y, &hy);
    let ss_coef = rho.mul_add(rho * yhy, rho);
    let n = s.len();
    for i in 0..n {
        for j in 0..n {
            h_inv[i][j] += ss_coef * s[i] * s[j]
                - rho * s[i].mul_add(hy[j], hy[i] * s[j]);
        }
    }
    true
}

/// Quasi-Newton minimization with a finite-difference gradient.
///
/// The gradient is approximated by forward differences and steps are chosen by
/// a backtracking line search satisfying the Armijo condition. Noisy functions
/// produce noisy gradients; prefer `nelder_mead` for stochastic objectives.
///
/// # Arguments
/// - f: The function to minimize
/// - x0: The initial guess
/// - params: Tolerances and budgets
pub fn bfgs<F>(mut f: F, x0: &[f64], params: &BfgsParams) -> OptimizeResult
where
    F: FnMut(&[f64]) -> f64,
{
    let n_dims = x0.len();
    assert!(n_dims > 0, "Cannot optimize a zero-dimensional function");
    let max_iters = params.max_iters.unwrap_or(n_dims * ITERS_PER_DIM);

    let mut n_evals: usize = 1;
    let mut x = x0.to_vec();
    let mut fx = finite_or_inf(f(&x));
    let mut grad = fd_gradient(&mut f, &x, fx, params.eps, &mut n_evals);
    let mut h_inv = identity(n_dims);

    let mut iters: usize = 0;
    let mut converged = false;

    while iters < max_iters {
        if !fx.is_finite() || grad.iter().any(|g| !g.is_finite()) {
            break;
        }
        if inf_norm(&grad) <= params.gtol {
            converged = true;
            break;
        }

        let mut dir: Vec<f64> =
            mat_vec(&h_inv, &grad).iter().map(|d| -d).collect();
        let mut slope = dot(&grad, &dir);
        if slope >= 0.0 {
            // Lost the descent direction; fall back to steepest descent
            h_inv = identity(n_dims);
            dir = grad.iter().map(|g| -g).collect();
            slope = dot(&grad, &dir);
        }

        let mut step: f64 = 1.0;
        let mut accepted = None;
        for _ in 0..params.max_backtracks {
            let x_new: Vec<f64> = x
                .iter()
                .zip(dir.iter())
                .map(|(xi, di)| step.mul_add(*di, *xi))
                .collect();
            n_evals += 1;
            let f_new = finite_or_inf(f(&x_new));
            if f_new <= (params.c1 * step).mul_add(slope, fx) {
                accepted = Some((x_new, f_new));
                break;
            }
            step *= 0.5;
        }

        let (x_new, f_new) = match accepted {
            Some(point) => point,
            None => break,
        };

        let grad_new =
            fd_gradient(&mut f, &x_new, f_new, params.eps, &mut n_evals);
        let s: Vec<f64> =
            x_new.iter().zip(x.iter()).map(|(a, b)| a - b).collect();
        let y: Vec<f64> =
            grad_new.iter().zip(grad.iter()).map(|(a, b)| a - b).collect();
        bfgs_update(&mut h_inv, &s, &y);

        x = x_new;
        fx = f_new;
        grad = grad_new;
        iters += 1;

        debug!("bfgs iter {}: f = {}, x = {:?}", iters, fx, x);
    }

    OptimizeResult {
        x,
        fx,
        iters,
        n_evals,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn dot_and_mat_vec() {
        assert_relative_eq!(dot(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
        let mat = vec![vec![1.0, 2.0], vec![0.0, -1.0]];
        assert_eq!(mat_vec(&mat, &[1.0, 1.0]), vec![3.0, -1.0]);
    }

    #[test]
    fn fd_gradient_of_quadratic() {
        let mut f = |x: &[f64]| x[0] * x[0] + 3.0 * x[1];
        let x = [2.0, -1.0];
        let fx = f(&x);
        let mut n_evals = 0;
        let grad = fd_gradient(&mut f, &x, fx, 1E-7, &mut n_evals);
        assert_relative_eq!(grad[0], 4.0, epsilon = 1E-5);
        assert_relative_eq!(grad[1], 3.0, epsilon = 1E-5);
        assert_eq!(n_evals, 2);
    }

    #[test]
    fn update_satisfies_secant_equation() {
        let mut h_inv = identity(2);
        let s = vec![0.5, -0.25];
        let y = vec![1.0, 0.5];
        assert!(bfgs_update(&mut h_inv, &s, &y));
        let hy = mat_vec(&h_inv, &y);
        assert_relative_eq!(hy[0], s[0], epsilon = 1E-12);
        assert_relative_eq!(hy[1], s[1], epsilon = 1E-12);
    }

    #[test]
    fn update_skipped_without_curvature() {
        let mut h_inv = identity(2);
        assert!(!bfgs_update(&mut h_inv, &[1.0, 0.0], &[-1.0, 0.0]));
        assert_eq!(h_inv, identity(2));
    }

    #[test]
    fn minimizes_quadratic_bowl() {
        let f = |x: &[f64]| {
            (x[0] - 1.0).powi(2) + 10.0 * (x[1] + 2.0).powi(2)
        };
        let res = bfgs(f, &[0.0, 0.0], &BfgsParams::default());
        assert!(res.converged);
        assert_relative_eq!(res.x[0], 1.0, epsilon = 1E-4);
        assert_relative_eq!(res.x[1], -2.0, epsilon = 1E-4);
    }

    #[test]
    fn minimizes_rosenbrock() {
        let f = |x: &[f64]| {
            (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
        };
        let res = bfgs(f, &[-1.2, 1.0], &BfgsParams::default());
        assert_relative_eq!(res.x[0], 1.0, epsilon = 1E-2);
        assert_relative_eq!(res.x[1], 1.0, epsilon = 1E-2);
    }

    #[test]
    fn stops_at_iteration_budget() {
        let f = |x: &[f64]| {
            (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
        };
        let params = BfgsParams {
            max_iters: Some(2),
            ..Default::default()
        };
        let res = bfgs(f, &[-1.2, 1.0], &params);
        assert!(!res.converged);
        assert_eq!(res.iters, 2);
    }
}
