use std::path::Path;

use nigfit_consts::INIT_PARAMS;
use nigfit_stats::NigParams;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::objective::{Loss, Objective, Targets};
use crate::optimize::{Method, OptimizeConfig};

/// Configuration for `fit`
///
/// Sets the objective, the starting point, the optimizer, and the PRNG seed.
/// Every field has a default, so an empty YAML document is a valid config.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct FitConfig {
    /// The loss to minimize
    pub objective: Objective,
    /// The initial guess
    pub init: NigParams,
    /// The optimization method and its tuning
    pub optimizer: OptimizeConfig,
    /// The PRNG seed. Seeded from entropy if `None`.
    pub seed: Option<u64>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FitConfig {
    pub fn new() -> Self {
        let [mu, nu, alpha, beta] = INIT_PARAMS;
        Self {
            objective: Objective::default(),
            init: NigParams::new_unchecked(mu, nu, alpha, beta),
            optimizer: OptimizeConfig::default(),
            seed: None,
        }
    }

    /// Read a config from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        let config: FitConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings that the types alone do not constrain
    pub fn validate(&self) -> Result<(), Error> {
        if self.objective.n_samples == 0 {
            return Err(Error::InvalidConfig(
                "n_samples must be greater than zero".into(),
            ));
        }
        let Targets { mean, var } = self.objective.targets;
        for (name, target) in [("mean", mean), ("var", var)] {
            if !target.mean.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "target {name} mean must be finite, got {}",
                    target.mean
                )));
            }
            if !(target.std > 0.0 && target.std.is_finite()) {
                return Err(Error::InvalidConfig(format!(
                    "target {name} std must be positive and finite, got {}",
                    target.std
                )));
            }
        }
        Ok(())
    }

    pub fn loss(mut self, loss: Loss) -> Self {
        self.objective.loss = loss;
        self
    }

    pub fn targets(mut self, targets: Targets) -> Self {
        self.objective.targets = targets;
        self
    }

    pub fn n_samples(mut self, n_samples: usize) -> Self {
        self.objective.n_samples = n_samples;
        self
    }

    pub fn common_seed(mut self, seed: Option<u64>) -> Self {
        self.objective.common_seed = seed;
        self
    }

    pub fn init(mut self, init: NigParams) -> Self {
        self.init = init;
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.optimizer.method = method;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}
