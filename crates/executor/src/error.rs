use std::path::PathBuf;

use thiserror::Error;

use common::error::Error as SolverError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    ConfigLoadError(String),

    #[error("{path}:{line}: {message}")]
    ParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Graph processing error: {0}")]
    GraphError(#[from] SolverError),

    #[error("Worker task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("Concurrency limiter closed")]
    LimiterClosed,
}

impl Error {
    /// Process exit code: 2 when the input could not be used at all, 1 when the
    /// computation itself failed.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::IoError(_)
            | Error::CsvError(_)
            | Error::ConfigLoadError(_)
            | Error::ParseError { .. } => 2,
            Error::GraphError(
                SolverError::AmbiguousResult { .. }
                | SolverError::CycleReconstructionFailed
                | SolverError::CountOverflow(_),
            ) => 1,
            Error::GraphError(_) => 2,
            Error::TaskFailed(_) | Error::LimiterClosed => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_exit_with_two() {
        let err = Error::from(SolverError::NodeIndexOutOfBounds(3));
        assert_eq!(err.exit_code(), 2);

        let err = Error::ParseError {
            path: PathBuf::from("g.txt"),
            line: 4,
            message: "bad vertex".into(),
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "g.txt:4: bad vertex");
    }

    #[test]
    fn algorithm_failures_exit_with_one() {
        let err = Error::from(SolverError::AmbiguousResult { rounds: 5 });
        assert_eq!(err.exit_code(), 1);
    }
}
