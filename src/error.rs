//! Error types for a sweep.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Everything that can abort a sweep.
///
/// None of these are recovered from locally: the driver returns the first
/// one it sees and the remaining cells are never attempted.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The benchmark program could not be launched at all.
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The benchmark program started but collecting its output failed.
    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The benchmark program ran but did not exit successfully.
    #[error("`{command}` failed ({status})")]
    ProcessFailure { command: String, status: ExitStatus },

    /// No output line carried the marker.
    #[error("{benchmark}: no output line of {allocator} with {threads} thread(s) contains {marker:?}")]
    MetricNotFound {
        benchmark: String,
        allocator: String,
        threads: u32,
        marker: String,
    },

    /// The selected column is neither an integer nor a real number.
    #[error("column {column} of {line:?} is not a number: {token:?}")]
    MetricParseFailure {
        line: String,
        column: usize,
        token: String,
    },

    /// The matching line has fewer tokens than the selected column needs.
    #[error("column {column} is out of range for {line:?}")]
    MissingColumn { line: String, column: usize },

    /// The result log could not be opened or appended to.
    #[error("result log {}: {source}", .path.display())]
    ResultLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown benchmark {name:?}")]
    UnknownBenchmark { name: String },
}

pub type Result<T, E = SweepError> = std::result::Result<T, E>;
