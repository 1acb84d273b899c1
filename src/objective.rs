//! Losses comparing draws from a candidate prior against moment targets
use nigfit_consts::{
    N_SAMPLES, TARGET_MEAN_MEAN, TARGET_MEAN_STD, TARGET_VAR_MEAN,
    TARGET_VAR_STD,
};
use nigfit_stats::rv::dist::Gaussian;
use nigfit_stats::rv::traits::Rv;
use nigfit_stats::NigParams;
use nigfit_utils::{mean_std, sort_floats, sum_sq_diff};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};

/// Target mean and standard deviation of one marginal
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MomentTarget {
    pub mean: f64,
    pub std: f64,
}

impl MomentTarget {
    pub fn new(mean: f64, std: f64) -> Self {
        MomentTarget { mean, std }
    }

    /// Draw `n` values from N(mean, std)
    pub fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let std_normal = Gaussian::standard();
        (0..n)
            .map(|_| {
                let z: f64 = std_normal.draw(rng);
                self.std.mul_add(z, self.mean)
            })
            .collect()
    }
}

/// Targets for the mean marginal and the variance marginal
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Targets {
    pub mean: MomentTarget,
    pub var: MomentTarget,
}

impl Default for Targets {
    fn default() -> Self {
        Targets {
            mean: MomentTarget::new(TARGET_MEAN_MEAN, TARGET_MEAN_STD),
            var: MomentTarget::new(TARGET_VAR_MEAN, TARGET_VAR_STD),
        }
    }
}

/// How draws are compared against the targets
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    /// Log of the squared differences between candidate draws and independent
    /// draws from the target normals, paired in draw order.
    ///
    /// Independent samples paired in draw order do not measure a distance
    /// between distributions: even identical distributions score about
    /// `ln(2n(σ²ₓ + σ²ᵥ))`. Prefer `Quantile`.
    Elementwise,
    /// Log of the squared differences between the sample means and standard
    /// deviations and the target means and standard deviations.
    #[default]
    Moments,
    /// Like `Elementwise`, but both samples are sorted before they are paired,
    /// which compares empirical quantiles.
    Quantile,
}

impl std::str::FromStr for Loss {
    type Err = String;

    fn from_str(s: &str) -> Result<Loss, Self::Err> {
        match s {
            "elementwise" => Ok(Self::Elementwise),
            "moments" => Ok(Self::Moments),
            "quantile" => Ok(Self::Quantile),
            _ => Err(format!("cannot parse '{s}'")),
        }
    }
}

impl std::fmt::Display for Loss {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Elementwise => write!(f, "elementwise"),
            Self::Moments => write!(f, "moments"),
            Self::Quantile => write!(f, "quantile"),
        }
    }
}

/// Sum of squared differences between the sample moments of `xs` and
/// `sigma2s` and their targets
pub fn moments_sse(xs: &[f64], sigma2s: &[f64], targets: &Targets) -> f64 {
    let (x_mean, x_std) = mean_std(xs);
    let (s_mean, s_std) = mean_std(sigma2s);
    [
        x_mean - targets.mean.mean,
        x_std - targets.mean.std,
        s_mean - targets.var.mean,
        s_std - targets.var.std,
    ]
    .iter()
    .map(|d| d * d)
    .sum()
}

/// A stochastic loss over `[μ, ν, α, β]`
///
/// Every evaluation draws `n_samples` fresh pairs from the candidate
/// distribution. With a `common_seed`, every evaluation draws from a generator
/// reset to that seed instead, which makes the loss a deterministic function of
/// the parameters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Objective {
    pub loss: Loss,
    pub targets: Targets,
    pub n_samples: usize,
    pub common_seed: Option<u64>,
}

impl Default for Objective {
    fn default() -> Self {
        Self::new(Loss::default())
    }
}

impl Objective {
    pub fn new(loss: Loss) -> Self {
        Objective {
            loss,
            targets: Targets::default(),
            n_samples: N_SAMPLES,
            common_seed: None,
        }
    }

    pub fn targets(mut self, targets: Targets) -> Self {
        self.targets = targets;
        self
    }

    pub fn n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn with_common_seed(mut self, seed: u64) -> Self {
        self.common_seed = Some(seed);
        self
    }

    /// Evaluate the loss at an optimizer vector. Vectors that are not valid
    /// parameters score positive infinity.
    pub fn eval<R: Rng>(&self, theta: &[f64], rng: &mut R) -> f64 {
        match NigParams::try_from(theta) {
            Ok(nig) => self.eval_params(&nig, rng),
            Err(_) => f64::INFINITY,
        }
    }

    /// Evaluate the loss at a set of parameters
    pub fn eval_params<R: Rng>(&self, nig: &NigParams, rng: &mut R) -> f64 {
        let loss = match self.common_seed {
            Some(seed) => {
                let mut crn = Xoshiro256Plus::seed_from_u64(seed);
                self.loss_from_draws(nig, &mut crn)
            }
            None => self.loss_from_draws(nig, rng),
        };
        if loss.is_nan() {
            f64::INFINITY
        } else {
            loss
        }
    }

    fn loss_from_draws<R: Rng>(&self, nig: &NigParams, rng: &mut R) -> f64 {
        let n = self.n_samples;
        let (mut xs, mut sigma2s) = nig.sample_columns(n, rng);
        let sse = match self.loss {
            Loss::Moments => moments_sse(&xs, &sigma2s, &self.targets),
            Loss::Elementwise => {
                let target_xs = self.targets.mean.sample(n, rng);
                let target_sigma2s = self.targets.var.sample(n, rng);
                sum_sq_diff(&xs, &target_xs)
                    + sum_sq_diff(&sigma2s, &target_sigma2s)
            }
            Loss::Quantile => {
                let mut target_xs = self.targets.mean.sample(n, rng);
                let mut target_sigma2s = self.targets.var.sample(n, rng);
                sort_floats(&mut xs);
                sort_floats(&mut sigma2s);
                sort_floats(&mut target_xs);
                sort_floats(&mut target_sigma2s);
                sum_sq_diff(&xs, &target_xs)
                    + sum_sq_diff(&sigma2s, &target_sigma2s)
            }
        };
        sse.ln()
    }
}
