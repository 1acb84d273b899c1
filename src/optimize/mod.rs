//! Unconstrained minimization of functions of several variables
mod bfgs;
mod simplex;

pub use bfgs::{bfgs, BfgsParams};
pub use simplex::{nelder_mead, NelderMeadParams};

use serde::{Deserialize, Serialize};

/// The method by which to optimize
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Derivative-free downhill simplex
    #[default]
    NelderMead,
    /// Quasi-Newton with a finite-difference gradient
    Bfgs,
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Method, Self::Err> {
        match s {
            "nelder_mead" | "nelder-mead" => Ok(Self::NelderMead),
            "bfgs" => Ok(Self::Bfgs),
            _ => Err(format!("cannot parse '{s}'")),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NelderMead => write!(f, "nelder_mead"),
            Self::Bfgs => write!(f, "bfgs"),
        }
    }
}

/// The method and its tuning
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields, default)]
pub struct OptimizeConfig {
    pub method: Method,
    pub nelder_mead: NelderMeadParams,
    pub bfgs: BfgsParams,
}

/// The outcome of a minimization
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OptimizeResult {
    /// The min point
    pub x: Vec<f64>,
    /// The function value at the min point
    pub fx: f64,
    /// The number of iterations performed
    pub iters: usize,
    /// The number of function evaluations performed
    pub n_evals: usize,
    /// Whether the tolerance was met before a budget ran out
    pub converged: bool,
}

/// Minimize `f` starting from `x0` with the configured method
pub fn minimize<F>(f: F, x0: &[f64], config: &OptimizeConfig) -> OptimizeResult
where
    F: FnMut(&[f64]) -> f64,
{
    match config.method {
        Method::NelderMead => nelder_mead(f, x0, &config.nelder_mead),
        Method::Bfgs => bfgs(f, x0, &config.bfgs),
    }
}

/// NaN compares false against everything and would stall the ordering of
/// candidate points, so it is read as the worst possible value.
#[inline]
pub(crate) fn finite_or_inf(fx: f64) -> f64 {
    if fx.is_nan() {
        f64::INFINITY
    } else {
        fx
    }
}
