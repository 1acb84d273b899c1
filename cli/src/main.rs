mod opt;
mod routes;

use clap::Parser;
use opt::Opt;

fn route_cmd(opt: Opt) -> i32 {
    match opt {
        Opt::Fit(cmd) => routes::fit(cmd),
        Opt::Sample(cmd) => routes::sample(cmd),
        Opt::Density(cmd) => routes::density(cmd),
        Opt::Moments(cmd) => routes::moments(cmd),
    }
}

fn main() {
    env_logger::init();

    let opt = Opt::parse();

    let exit_code = route_cmd(opt);

    std::process::exit(exit_code);
}
