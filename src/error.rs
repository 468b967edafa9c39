use thiserror::Error;

use crate::timing::OperationKind;

/// Errors surfaced by the benchmark and the cost model.
///
/// None of these are retried: they all describe the environment or the
/// configuration, so running again with the same inputs cannot help.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported algebraic structure: {0}")]
    UnsupportedStructure(String),
    #[error("clock went backwards while timing {operation}")]
    Timing { operation: OperationKind },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no mean latency for {operation}")]
    MissingOperand { operation: OperationKind },
    #[error("malformed pairing parameters: {0}")]
    Params(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
