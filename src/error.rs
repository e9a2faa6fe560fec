use thiserror::Error;

/// Errors surfaced by task construction, scheduler configuration and
/// result files. Nothing in the simulation loop itself can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// A task was built with values no scheduler can run.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A scheduler was built with an unusable queue/quantum layout.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A results file did not match the exported CSV layout.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
