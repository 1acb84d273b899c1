#![warn(unused_extern_crates)]
#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! Fit the hyperparameters of a normal-inverse-gamma prior so that its draws
//! match target moments of the mean and the variance.
//!
//! # Example
//!
//! Fit the default moment targets with a fixed seed and common random
//! numbers, so the run is reproducible and the loss surface is smooth.
//!
//! ```rust,no_run
//! use nigfit::{fit, FitConfig};
//!
//! let config = FitConfig::new()
//!     .seed(Some(1337))
//!     .common_seed(Some(1337))
//!     .n_samples(2_000);
//!
//! let fitted = fit(&config).unwrap();
//! let [mu, nu, alpha, beta] = fitted.params.to_array();
//! println!("{mu} {nu} {alpha} {beta}");
//! ```
//!
//! The density and the sampler are available on the parameters directly.
//!
//! ```rust
//! use nigfit::rv::traits::Rv;
//! use nigfit::NigParams;
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256Plus;
//!
//! let nig = NigParams::new(0.0, 0.054, 1.12, 0.4).unwrap();
//! let mut rng = Xoshiro256Plus::seed_from_u64(1337);
//!
//! let draws: Vec<(f64, f64)> = nig.sample(100, &mut rng);
//! assert_eq!(draws.len(), 100);
//! assert!(draws.iter().all(|(_, sigma2)| *sigma2 > 0.0));
//! assert!(nig.f(&draws[0]) >= 0.0);
//! ```
pub mod config;
pub mod error;
pub mod fit;
pub mod objective;
pub mod optimize;

pub use config::FitConfig;
pub use error::Error;
pub use fit::{fit, fit_with_rng, Fit};
pub use objective::{Loss, MomentTarget, Objective, Targets};
pub use optimize::{Method, OptimizeConfig, OptimizeResult};

pub use nigfit_consts as consts;
pub use nigfit_stats::{rv, NigError, NigMoments, NigParams};
pub use nigfit_utils as utils;
