use std::io::{self, BufWriter, Write};

use log::info;
use nigfit::rv::traits::Rv;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::opt;

fn rng_from_seed(seed: Option<u64>) -> Xoshiro256Plus {
    match seed {
        Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
        None => Xoshiro256Plus::from_entropy(),
    }
}

pub fn fit(cmd: opt::FitArgs) -> i32 {
    let config = match cmd.fit_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Could not build fit config: {err}");
            return 1;
        }
    };

    let fitted = match nigfit::fit(&config) {
        Ok(fitted) => fitted,
        Err(err) => {
            eprintln!("Fit failed: {err}");
            return 1;
        }
    };

    if cmd.yaml {
        match serde_yaml::to_string(&fitted) {
            Ok(yaml) => print!("{yaml}"),
            Err(err) => {
                eprintln!("Could not serialize fit: {err}");
                return 1;
            }
        }
    } else {
        let [mu, nu, alpha, beta] = fitted.params.to_array();
        println!("{mu} {nu} {alpha} {beta}");
    }
    0
}

fn write_samples(cmd: &opt::SampleArgs) -> io::Result<()> {
    let opt::ParamsArg(nig) = cmd.params;
    let mut rng = rng_from_seed(cmd.seed);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "x,sigma2")?;
    for _ in 0..cmd.n {
        let (x, sigma2) = nig.draw(&mut rng);
        writeln!(out, "{x},{sigma2}")?;
    }
    out.flush()
}

pub fn sample(cmd: opt::SampleArgs) -> i32 {
    info!("Drawing {} samples from {}", cmd.n, cmd.params.0);
    match write_samples(&cmd) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Failed to write samples: {err}");
            1
        }
    }
}

pub fn density(cmd: opt::DensityArgs) -> i32 {
    let opt::ParamsArg(nig) = cmd.params;
    let pair = (cmd.x, cmd.sigma2);
    if cmd.log {
        println!("{}", nig.ln_f(&pair));
    } else {
        println!("{}", nig.f(&pair));
    }
    0
}

pub fn moments(cmd: opt::MomentsArgs) -> i32 {
    let opt::ParamsArg(nig) = cmd.params;
    match serde_yaml::to_string(&nig.moments()) {
        Ok(yaml) => {
            print!("{yaml}");
            0
        }
        Err(err) => {
            eprintln!("Could not serialize moments: {err}");
            1
        }
    }
}
