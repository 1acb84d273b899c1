#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! Default values for the fitting targets and the optimizers
pub use rv;

/// Target mean of the mean marginal
pub const TARGET_MEAN_MEAN: f64 = 2.3;

/// Target standard deviation of the mean marginal
pub const TARGET_MEAN_STD: f64 = 0.5;

/// Target mean of the variance marginal
pub const TARGET_VAR_MEAN: f64 = 2.75;

/// Target standard deviation of the variance marginal
pub const TARGET_VAR_STD: f64 = 1.0;

/// Number of draws taken per objective evaluation
pub const N_SAMPLES: usize = 10_000;

/// Initial guess for (μ, ν, α, β)
pub const INIT_PARAMS: [f64; 4] = [0.0, 0.5, 1.0, 0.5];

/// Nelder-Mead absolute tolerance on the simplex vertices
pub const NELDER_MEAD_XATOL: f64 = 1E-4;

/// Nelder-Mead absolute tolerance on the function values
pub const NELDER_MEAD_FATOL: f64 = 1E-4;

/// BFGS tolerance on the infinity norm of the gradient
pub const BFGS_GTOL: f64 = 1E-5;

/// Iteration budget per optimized dimension
pub const ITERS_PER_DIM: usize = 200;
