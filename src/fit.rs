use log::{info, warn};
use nigfit_stats::NigParams;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};

use crate::config::FitConfig;
use crate::error::Error;
use crate::objective::Loss;
use crate::optimize::{minimize, Method};

/// The fitted prior and how the optimizer got there
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Fit {
    /// The fitted parameters
    pub params: NigParams,
    /// The loss observed at `params`
    pub loss: f64,
    /// The loss used
    pub objective: Loss,
    /// The optimizer used
    pub method: Method,
    /// Optimizer iterations
    pub iters: usize,
    /// Objective evaluations
    pub n_evals: usize,
    /// Whether the optimizer met its tolerance
    pub converged: bool,
}

/// Fit the prior with a generator seeded from `config.seed`, or from entropy
/// if there is no seed.
pub fn fit(config: &FitConfig) -> Result<Fit, Error> {
    let mut rng = match config.seed {
        Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
        None => Xoshiro256Plus::from_entropy(),
    };
    fit_with_rng(config, &mut rng)
}

/// Fit the prior drawing every objective evaluation from `rng`
pub fn fit_with_rng<R: Rng>(
    config: &FitConfig,
    rng: &mut R,
) -> Result<Fit, Error> {
    config.validate()?;

    let objective = &config.objective;
    let method = config.optimizer.method;
    info!(
        "Fitting {} loss with {} from {} ({} draws per evaluation)",
        objective.loss, method, config.init, objective.n_samples
    );
    if objective.loss == Loss::Elementwise {
        warn!(
            "The elementwise loss pairs independent draws and does not \
            vanish for matching distributions. Consider the quantile loss."
        );
    }

    let x0 = config.init.to_array();
    let result = minimize(
        |theta| objective.eval(theta, rng),
        &x0,
        &config.optimizer,
    );

    if !result.converged {
        warn!(
            "Optimizer stopped before converging after {} iterations and {} \
            evaluations",
            result.iters, result.n_evals
        );
    }

    let params =
        NigParams::try_from(result.x.as_slice()).map_err(Error::InvalidFit)?;
    info!("Fit {} with loss {}", params, result.fx);

    Ok(Fit {
        params,
        loss: result.fx,
        objective: objective.loss,
        method,
        iters: result.iters,
        n_evals: result.n_evals,
        converged: result.converged,
    })
}
