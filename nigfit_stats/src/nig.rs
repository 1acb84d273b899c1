//! Joint density and sampling for the normal-inverse-gamma distribution.
//!
//! Draws are `(x, σ²)` pairs where `σ² ~ InvGamma(α, β)` and
//! `x | σ² ~ N(μ, σ²/ν)`. Note that `ν` scales the *precision* of `x`, so the
//! standard deviation of `x` given `σ²` is `sqrt(σ²/ν)`.
use std::fmt;

use crate::rv::dist::{Gaussian, InvGamma};
use crate::rv::traits::Rv;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing `NigParams`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NigError {
    #[error("μ must be finite, got {mu}")]
    MuNotFinite { mu: f64 },
    #[error("ν must be finite, got {nu}")]
    NuNotFinite { nu: f64 },
    #[error("ν must be greater than zero, got {nu}")]
    NuTooLow { nu: f64 },
    #[error("α must be finite, got {alpha}")]
    AlphaNotFinite { alpha: f64 },
    #[error("α must be greater than zero, got {alpha}")]
    AlphaTooLow { alpha: f64 },
    #[error("β must be finite, got {beta}")]
    BetaNotFinite { beta: f64 },
    #[error("β must be greater than zero, got {beta}")]
    BetaTooLow { beta: f64 },
    #[error("expected 4 parameters (μ, ν, α, β), got {n}")]
    WrongDimension { n: usize },
}

/// Parameters of a normal-inverse-gamma distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNigParams")]
pub struct NigParams {
    mu: f64,
    nu: f64,
    alpha: f64,
    beta: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNigParams {
    mu: f64,
    nu: f64,
    alpha: f64,
    beta: f64,
}

impl TryFrom<RawNigParams> for NigParams {
    type Error = NigError;

    fn try_from(raw: RawNigParams) -> Result<Self, Self::Error> {
        NigParams::new(raw.mu, raw.nu, raw.alpha, raw.beta)
    }
}

impl NigParams {
    /// Create a new set of parameters
    ///
    /// # Arguments
    /// - mu: The location of the mean marginal
    /// - nu: Precision scaling of the mean relative to the variance
    /// - alpha: Shape of the inverse-gamma variance marginal
    /// - beta: Scale of the inverse-gamma variance marginal
    ///
    /// # Example
    ///
    /// ```rust
    /// use nigfit_stats::NigParams;
    ///
    /// assert!(NigParams::new(0.0, 0.5, 1.0, 0.5).is_ok());
    /// assert!(NigParams::new(0.0, -0.5, 1.0, 0.5).is_err());
    /// ```
    pub fn new(
        mu: f64,
        nu: f64,
        alpha: f64,
        beta: f64,
    ) -> Result<Self, NigError> {
        if !mu.is_finite() {
            Err(NigError::MuNotFinite { mu })
        } else if !nu.is_finite() {
            Err(NigError::NuNotFinite { nu })
        } else if !alpha.is_finite() {
            Err(NigError::AlphaNotFinite { alpha })
        } else if !beta.is_finite() {
            Err(NigError::BetaNotFinite { beta })
        } else if nu <= 0.0 {
            Err(NigError::NuTooLow { nu })
        } else if alpha <= 0.0 {
            Err(NigError::AlphaTooLow { alpha })
        } else if beta <= 0.0 {
            Err(NigError::BetaTooLow { beta })
        } else {
            Ok(NigParams {
                mu,
                nu,
                alpha,
                beta,
            })
        }
    }

    /// Create parameters without checking whether they are valid
    #[inline(always)]
    pub fn new_unchecked(mu: f64, nu: f64, alpha: f64, beta: f64) -> Self {
        NigParams {
            mu,
            nu,
            alpha,
            beta,
        }
    }

    #[inline(always)]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    #[inline(always)]
    pub fn nu(&self) -> f64 {
        self.nu
    }

    #[inline(always)]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline(always)]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Returns `[μ, ν, α, β]`, the layout the optimizers work with
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.mu, self.nu, self.alpha, self.beta]
    }

    /// Draw `n` pairs and split them into the mean column and the variance
    /// column.
    pub fn sample_columns<R: Rng>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> (Vec<f64>, Vec<f64>) {
        let mut xs = Vec::with_capacity(n);
        let mut sigma2s = Vec::with_capacity(n);
        for _ in 0..n {
            let (x, sigma2) = self.draw(rng);
            xs.push(x);
            sigma2s.push(sigma2);
        }
        (xs, sigma2s)
    }

    /// Analytic moments of the two marginals
    pub fn moments(&self) -> NigMoments {
        let am1 = self.alpha - 1.0;
        let var_mean = if self.alpha > 1.0 {
            Some(self.beta / am1)
        } else {
            None
        };
        let var_std = if self.alpha > 2.0 {
            Some(self.beta / (am1 * (self.alpha - 2.0).sqrt()))
        } else {
            None
        };
        let mean_std = var_mean.map(|m| (m / self.nu).sqrt());
        NigMoments {
            mean_mean: self.mu,
            mean_std,
            var_mean,
            var_std,
        }
    }

    fn inv_gamma(&self) -> InvGamma {
        InvGamma::new_unchecked(self.alpha, self.beta)
    }
}

impl TryFrom<&[f64]> for NigParams {
    type Error = NigError;

    fn try_from(theta: &[f64]) -> Result<Self, Self::Error> {
        match theta {
            [mu, nu, alpha, beta] => NigParams::new(*mu, *nu, *alpha, *beta),
            _ => Err(NigError::WrongDimension { n: theta.len() }),
        }
    }
}

impl From<&NigParams> for String {
    fn from(nig: &NigParams) -> String {
        format!(
            "Normal-Inverse-Gamma(μ: {}, ν: {}, α: {}, β: {})",
            nig.mu, nig.nu, nig.alpha, nig.beta
        )
    }
}

impl fmt::Display for NigParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from(self))
    }
}

impl Rv<(f64, f64)> for NigParams {
    /// Log of N(x | μ, sqrt(σ²/ν)) · InvGamma(σ² | α, β). Negative infinity
    /// outside the support.
    fn ln_f(&self, pair: &(f64, f64)) -> f64 {
        let (x, sigma2) = *pair;
        if !(sigma2 > 0.0 && sigma2.is_finite()) {
            return f64::NEG_INFINITY;
        }
        let sigma = (sigma2 / self.nu).sqrt();
        let ln_f_x = Gaussian::new_unchecked(self.mu, sigma).ln_f(&x);
        let ln_f_sigma2 = self.inv_gamma().ln_f(&sigma2);
        ln_f_x + ln_f_sigma2
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        let sigma2: f64 = self.inv_gamma().draw(rng);
        let sigma2 = if sigma2 <= 0.0 { f64::EPSILON } else { sigma2 };

        let z: f64 = Gaussian::standard().draw(rng);
        let x = (sigma2 / self.nu).sqrt().mul_add(z, self.mu);
        (x, sigma2)
    }
}

/// Means and standard deviations of the mean marginal (`x`) and the variance
/// marginal (`σ²`).
///
/// A moment is `None` when it does not exist: the variance marginal has a
/// mean only for α > 1 and a standard deviation only for α > 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NigMoments {
    pub mean_mean: f64,
    pub mean_std: Option<f64>,
    pub var_mean: Option<f64>,
    pub var_std: Option<f64>,
}
