use clap::Parser;
use nigfit::{Error, FitConfig, Loss, Method, NigParams};
use std::path::PathBuf;
use std::str::FromStr;

/// Normal-inverse-gamma parameters written as `MU,NU,ALPHA,BETA`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamsArg(pub NigParams);

impl FromStr for ParamsArg {
    type Err = String;

    fn from_str(s: &str) -> Result<ParamsArg, Self::Err> {
        let theta = s
            .split(',')
            .map(|x| x.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|err| format!("cannot parse '{s}': {err}"))?;
        NigParams::try_from(theta.as_slice())
            .map(ParamsArg)
            .map_err(|err| format!("invalid parameters '{s}': {err}"))
    }
}

#[derive(Parser, Debug)]
pub struct FitArgs {
    /// Path to a fit config YAML. Flags override its settings.
    #[clap(long = "config", short = 'c')]
    pub config: Option<PathBuf>,
    /// The loss to minimize: moments, elementwise, or quantile
    #[clap(long = "loss")]
    pub loss: Option<Loss>,
    /// The optimizer: nelder_mead or bfgs
    #[clap(long = "method")]
    pub method: Option<Method>,
    /// The number of draws per objective evaluation
    #[clap(long = "n-samples", short = 'n')]
    pub n_samples: Option<usize>,
    /// The initial guess as MU,NU,ALPHA,BETA
    #[clap(long = "init")]
    pub init: Option<ParamsArg>,
    /// The PRNG seed
    #[clap(long = "seed")]
    pub seed: Option<u64>,
    /// Reuse the draws from this seed on every evaluation
    #[clap(long = "common-seed")]
    pub common_seed: Option<u64>,
    /// Print the whole fit as YAML instead of the four parameters
    #[clap(long)]
    pub yaml: bool,
}

impl FitArgs {
    pub fn fit_config(&self) -> Result<FitConfig, Error> {
        let mut config = match self.config {
            Some(ref path) => FitConfig::from_yaml(path)?,
            None => FitConfig::default(),
        };

        if let Some(loss) = self.loss {
            config = config.loss(loss);
        }
        if let Some(method) = self.method {
            config = config.method(method);
        }
        if let Some(n_samples) = self.n_samples {
            config = config.n_samples(n_samples);
        }
        if let Some(ParamsArg(init)) = self.init {
            config = config.init(init);
        }
        if self.seed.is_some() {
            config = config.seed(self.seed);
        }
        if self.common_seed.is_some() {
            config = config.common_seed(self.common_seed);
        }

        Ok(config)
    }
}

#[derive(Parser, Debug)]
pub struct SampleArgs {
    /// The distribution parameters as MU,NU,ALPHA,BETA
    #[clap(long = "params", short = 'p')]
    pub params: ParamsArg,
    /// The number of draws
    #[clap(short = 'n', default_value = "10000")]
    pub n: usize,
    /// The PRNG seed
    #[clap(long = "seed")]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct DensityArgs {
    /// The distribution parameters as MU,NU,ALPHA,BETA
    #[clap(long = "params", short = 'p')]
    pub params: ParamsArg,
    /// The mean value
    #[clap(value_name = "X", allow_negative_numbers = true)]
    pub x: f64,
    /// The variance value
    #[clap(value_name = "SIGMA2", allow_negative_numbers = true)]
    pub sigma2: f64,
    /// Print the log density
    #[clap(long)]
    pub log: bool,
}

#[derive(Parser, Debug)]
pub struct MomentsArgs {
    /// The distribution parameters as MU,NU,ALPHA,BETA
    #[clap(long = "params", short = 'p')]
    pub params: ParamsArg,
}

#[derive(Parser, Debug)]
#[clap(
    name = "nigfit",
    author,
    version,
    about = "Fit normal-inverse-gamma priors to moment targets"
)]
pub enum Opt {
    /// Fit the prior hyperparameters
    #[clap(name = "fit")]
    Fit(FitArgs),
    /// Draw (x, σ²) pairs as CSV
    #[clap(name = "sample")]
    Sample(SampleArgs),
    /// Evaluate the joint density at (x, σ²)
    #[clap(name = "density")]
    Density(DensityArgs),
    /// Print the analytic moments of the marginals
    #[clap(name = "moments")]
    Moments(MomentsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_params_arg() {
        let ParamsArg(nig) = "0, 0.5, 1, 0.5".parse().unwrap();
        assert_eq!(nig.to_array(), [0.0, 0.5, 1.0, 0.5]);
    }

    #[test]
    fn params_arg_rejects_bad_input() {
        assert!("0,0.5,1".parse::<ParamsArg>().is_err());
        assert!("0,0.5,one,0.5".parse::<ParamsArg>().is_err());
        assert!("0,-0.5,1,0.5".parse::<ParamsArg>().is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let opt = Opt::parse_from([
            "nigfit",
            "fit",
            "--loss",
            "quantile",
            "--method",
            "bfgs",
            "-n",
            "100",
            "--init",
            "1,2,3,4",
            "--seed",
            "5",
        ]);
        let config = match opt {
            Opt::Fit(args) => args.fit_config().unwrap(),
            _ => panic!("expected fit"),
        };
        assert_eq!(config.objective.loss, Loss::Quantile);
        assert_eq!(config.optimizer.method, Method::Bfgs);
        assert_eq!(config.objective.n_samples, 100);
        assert_eq!(config.init.to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.objective.common_seed, None);
    }

    #[test]
    fn density_accepts_negative_x() {
        let opt = Opt::parse_from([
            "nigfit", "density", "-p", "0,1,1,1", "-1.5", "2.0",
        ]);
        match opt {
            Opt::Density(args) => {
                assert_eq!(args.x, -1.5);
                assert_eq!(args.sigma2, 2.0);
            }
            _ => panic!("expected density"),
        }
    }
}
