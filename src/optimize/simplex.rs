use log::debug;
use nigfit_consts::{ITERS_PER_DIM, NELDER_MEAD_FATOL, NELDER_MEAD_XATOL};
use nigfit_utils::argsort;
use serde::{Deserialize, Serialize};

use super::{finite_or_inf, OptimizeResult};

/// Nelder-Mead tuning
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct NelderMeadParams {
    /// Absolute spread of the simplex vertices at which to stop
    pub xatol: f64,
    /// Absolute spread of the simplex function values at which to stop
    pub fatol: f64,
    /// Maximum number of iterations. Defaults to 200 times the dimension.
    pub max_iters: Option<usize>,
    /// Maximum number of function evaluations. Defaults to 200 times the
    /// dimension.
    pub max_evals: Option<usize>,
    /// Scale the simplex coefficients with the dimension (Gao & Han, 2012)
    pub adaptive: bool,
}

impl Default for NelderMeadParams {
    fn default() -> Self {
        NelderMeadParams {
            xatol: NELDER_MEAD_XATOL,
            fatol: NELDER_MEAD_FATOL,
            max_iters: None,
            max_evals: None,
            adaptive: false,
        }
    }
}

struct Coefficients {
    rho: f64,
    chi: f64,
    psi: f64,
    sigma: f64,
}

impl Coefficients {
    fn new(adaptive: bool, n_dims: usize) -> Self {
        if adaptive {
            let dim = n_dims as f64;
            Coefficients {
                rho: 1.0,
                chi: 1.0 + 2.0 / dim,
                psi: 0.75 - 1.0 / (2.0 * dim),
                sigma: 1.0 - 1.0 / dim,
            }
        } else {
            Coefficients {
                rho: 1.0,
                chi: 2.0,
                psi: 0.5,
                sigma: 0.5,
            }
        }
    }
}

/// `a * (1 + c) - b * c` elementwise. Every simplex move is one of these.
#[inline]
fn affine(a: &[f64], b: &[f64], c: f64) -> Vec<f64> {
    a.iter()
        .zip(b.iter())
        .map(|(ai, bi)| ai.mul_add(1.0 + c, -bi * c))
        .collect()
}

fn initial_simplex(x0: &[f64]) -> Vec<Vec<f64>> {
    const NONZDELT: f64 = 0.05;
    const ZDELT: f64 = 0.00025;

    let mut sim = Vec::with_capacity(x0.len() + 1);
    sim.push(x0.to_vec());
    for k in 0..x0.len() {
        let mut y = x0.to_vec();
        if y[k] != 0.0 {
            y[k] *= 1.0 + NONZDELT;
        } else {
            y[k] = ZDELT;
        }
        sim.push(y);
    }
    sim
}

fn sort_simplex(sim: &mut Vec<Vec<f64>>, fsim: &mut Vec<f64>) {
    let ixs = argsort(fsim);
    *sim = ixs.iter().map(|&ix| sim[ix].clone()).collect();
    *fsim = ixs.iter().map(|&ix| fsim[ix]).collect();
}

fn has_converged(
    sim: &[Vec<f64>],
    fsim: &[f64],
    xatol: f64,
    fatol: f64,
) -> bool {
    let best = &sim[0];
    let x_spread = sim[1..].iter().fold(0.0, |acc: f64, vertex| {
        vertex
            .iter()
            .zip(best.iter())
            .fold(acc, |acc, (v, b)| acc.max((v - b).abs()))
    });
    let f_spread = fsim[1..]
        .iter()
        .fold(0.0, |acc: f64, f| acc.max((fsim[0] - f).abs()));
    x_spread <= xatol && f_spread <= fatol
}

/// Multidimensional downhill simplex ported from Scipy's `fmin`.
///
/// The function may be stochastic. The value reported for the best vertex is
/// the value observed when that vertex was evaluated, so the returned `fx` is
/// never greater than the first evaluation at `x0`. Non-finite values are
/// treated as positive infinity.
///
/// # Arguments
/// - f: The function to minimize
/// - x0: The initial guess
/// - params: Tolerances and budgets
pub fn nelder_mead<F>(
    mut f: F,
    x0: &[f64],
    params: &NelderMeadParams,
) -> OptimizeResult
where
    F: FnMut(&[f64]) -> f64,
{
    let n_dims = x0.len();
    assert!(n_dims > 0, "Cannot optimize a zero-dimensional function");

    let max_iters = params.max_iters.unwrap_or(n_dims * ITERS_PER_DIM);
    let max_evals = params.max_evals.unwrap_or(n_dims * ITERS_PER_DIM);
    let Coefficients {
        rho,
        chi,
        psi,
        sigma,
    } = Coefficients::new(params.adaptive, n_dims);

    let mut n_evals: usize = 0;

    let mut sim = initial_simplex(x0);
    let mut fsim: Vec<f64> =
        sim.iter().map(|x| eval(&mut f, x, &mut n_evals)).collect();
    sort_simplex(&mut sim, &mut fsim);

    let mut iters: usize = 1;
    let mut converged = false;

    loop {
        if has_converged(&sim, &fsim, params.xatol, params.fatol) {
            converged = true;
            break;
        }
        if iters >= max_iters || n_evals >= max_evals {
            break;
        }

        let worst = &sim[n_dims];
        let xbar: Vec<f64> = (0..n_dims)
            .map(|i| {
                sim[..n_dims].iter().map(|v| v[i]).sum::<f64>()
                    / n_dims as f64
            })
            .collect();

        let xr = affine(&xbar, worst, rho);
        let fxr = eval(&mut f, &xr, &mut n_evals);

        let mut shrink = false;
        if fxr < fsim[0] {
            let xe = affine(&xbar, worst, rho * chi);
            let fxe = eval(&mut f, &xe, &mut n_evals);
            if fxe < fxr {
                sim[n_dims] = xe;
                fsim[n_dims] = fxe;
            } else {
                sim[n_dims] = xr;
                fsim[n_dims] = fxr;
            }
        } else if fxr < fsim[n_dims - 1] {
            sim[n_dims] = xr;
            fsim[n_dims] = fxr;
        } else if fxr < fsim[n_dims] {
            // outside contraction
            let xc = affine(&xbar, worst, psi * rho);
            let fxc = eval(&mut f, &xc, &mut n_evals);
            if fxc <= fxr {
                sim[n_dims] = xc;
                fsim[n_dims] = fxc;
            } else {
                shrink = true;
            }
        } else {
            // inside contraction
            let xcc = affine(&xbar, worst, -psi);
            let fxcc = eval(&mut f, &xcc, &mut n_evals);
            if fxcc < fsim[n_dims] {
                sim[n_dims] = xcc;
                fsim[n_dims] = fxcc;
            } else {
                shrink = true;
            }
        }

        if shrink {
            let best = sim[0].clone();
            for j in 1..=n_dims {
                sim[j] = affine(&best, &sim[j], -sigma);
                fsim[j] = eval(&mut f, &sim[j], &mut n_evals);
            }
        }

        sort_simplex(&mut sim, &mut fsim);
        debug!(
            "nelder-mead iter {}: f = {}, x = {:?}",
            iters, fsim[0], sim[0]
        );
        iters += 1;
    }

    OptimizeResult {
        x: sim.swap_remove(0),
        fx: fsim[0],
        iters,
        n_evals,
        converged,
    }
}

#[inline]
fn eval<F>(f: &mut F, x: &[f64], n_evals: &mut usize) -> f64
where
    F: FnMut(&[f64]) -> f64,
{
    *n_evals += 1;
    finite_or_inf(f(x))
}
