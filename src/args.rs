use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::analyzer::{default_workers, AnalyzerConfig, DEFAULT_PROGRESS_INTERVAL};
use crate::domain::DEFAULT_DOMAIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "logtally",
    about = "Count domain referers and daily success ratio in an nginx access log",
    version,
    long_about = None
)]
pub struct Args {
    /// Access log to analyze
    pub log_file: PathBuf,

    /// Day to report on, in log format (e.g. 28/Feb/2019)
    pub target_date: String,

    /// Domain whose HTTPS referers are counted
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// File the results are written to
    #[arg(short, long, default_value = "analysis_results.txt")]
    pub output: PathBuf,

    /// Only print results, do not write the results file
    #[arg(long)]
    pub no_output_file: bool,

    /// Console output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Classify lines on a thread pool
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of worker threads; implies --parallel
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Log progress every N lines (0 disables)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            domain: self.domain.clone(),
            progress_interval: self.progress_interval,
        }
    }

    /// Worker count for sharded analysis, `None` for a sequential pass.
    pub fn worker_count(&self) -> Option<usize> {
        match (self.parallel, self.workers) {
            (_, Some(workers)) => Some(workers),
            (true, None) => Some(default_workers()),
            (false, None) => None,
        }
    }
}
