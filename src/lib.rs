pub mod analyzer;
pub mod args;
pub mod date;
pub mod domain;
pub mod error;
pub mod lines;
pub mod patterns;
pub mod report;
pub mod stats;
pub mod utils;

pub use analyzer::{analyze, Analyzer, AnalyzerConfig};
pub use args::{Args, OutputFormat};
pub use error::AnalyzeError;
pub use patterns::{LineParser, LogRecord};
pub use stats::{AnalysisResult, Tally};
