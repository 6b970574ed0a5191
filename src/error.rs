use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("log file {path:?} could not be opened")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed reading log at line {line}")]
    SourceReadFailure {
        line: u64,
        #[source]
        source: io::Error,
    },

    #[error("invalid target date {0:?}, expected a date like '28/Feb/2019'")]
    InvalidTargetDateFormat(String),

    #[error("status {value:?} at line {line} is not an integer")]
    InvalidStatus { line: u64, value: String },

    #[error("access log pattern failed to compile")]
    Pattern(#[from] regex::Error),

    #[error("failed to build worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
