use nigfit_stats::NigError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Optimizer stopped at invalid parameters: {0}")]
    InvalidFit(NigError),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
    #[error("YamlError: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
