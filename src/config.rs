use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::provider::HashFunction;

pub const DEFAULT_ITERATIONS: usize = 1000;
pub const DEFAULT_AGGREGATION_SIZE: u64 = 10;

/// Everything a run can be tuned with.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Timed calls per primitive.
    pub iterations: usize,
    /// Signatures per aggregate, `n` in the aggregate verification formulas.
    pub aggregation_size: u64,
    /// Pairing parameter file; the built-in Type A set when absent.
    pub params: Option<PathBuf>,
    pub hash: HashFunction,
    /// Seed for operand sampling; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            iterations: DEFAULT_ITERATIONS,
            aggregation_size: DEFAULT_AGGREGATION_SIZE,
            params: None,
            hash: HashFunction::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(Error::InvalidConfiguration(
                "iteration count must be at least 1".into(),
            ));
        }
        validate_aggregation_size(self.aggregation_size)
    }
}

pub fn validate_aggregation_size(n: u64) -> Result<()> {
    if n < 1 {
        return Err(Error::InvalidConfiguration(
            "aggregation size must be at least 1".into(),
        ));
    }
    Ok(())
}
