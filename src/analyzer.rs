use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufReader};
use std::num::IntErrorKind;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::{RefererMatcher, DEFAULT_DOMAIN};
use crate::error::AnalyzeError;
use crate::lines::LogLines;
use crate::patterns::{LineParser, LogRecord};
use crate::stats::{AnalysisResult, Tally};

pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Domain whose HTTPS referers are counted
    pub domain: String,
    /// Emit a progress event every this many lines, 0 disables it
    pub progress_interval: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Default pool size for sharded analysis.
pub fn default_workers() -> usize {
    std::cmp::min(num_cpus::get(), 8)
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Convert a status field to a code. Values too large for `u16` are `None`;
/// anything that is not a decimal integer is an error.
fn status_code(line_no: u64, status: &str) -> Result<Option<u16>, AnalyzeError> {
    match status.parse::<u64>() {
        Ok(code) => Ok(u16::try_from(code).ok()),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(None),
        Err(_) => Err(AnalyzeError::InvalidStatus {
            line: line_no,
            value: status.to_string(),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    parser: LineParser,
    referers: RefererMatcher,
    progress_interval: u64,
}

impl Analyzer {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzeError> {
        Ok(Self {
            parser: LineParser::new()?,
            referers: RefererMatcher::new(&config.domain),
            progress_interval: config.progress_interval,
        })
    }

    /// Fold one line into `tally`. The line itself is counted by the caller.
    fn classify_line(
        &self,
        line_no: u64,
        line: &str,
        target_date: &str,
        tally: &mut Tally,
    ) -> Result<(), AnalyzeError> {
        let Some(record) = self.parser.parse(line.trim()) else {
            return Ok(());
        };
        self.classify(line_no, &record, target_date, tally)
    }

    fn classify(
        &self,
        line_no: u64,
        record: &LogRecord<'_>,
        target_date: &str,
        tally: &mut Tally,
    ) -> Result<(), AnalyzeError> {
        if record.referer().is_some_and(|referer| self.referers.matches(referer)) {
            tally.https_domain_referers += 1;
        }

        if record.date() == target_date {
            tally.daily_requests += 1;
            if status_code(line_no, record.status)?.is_some_and(is_success) {
                tally.daily_successes += 1;
            }
        }

        Ok(())
    }

    /// Single forward pass over `lines`. Any read error aborts the pass and
    /// discards the counters gathered so far.
    pub fn analyze<I>(
        &self,
        lines: I,
        target_date: &str,
    ) -> Result<AnalysisResult, AnalyzeError>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let start_time = Instant::now();
        info!(
            action = "start",
            component = "analysis",
            target_date,
            "Starting log analysis"
        );

        let mut tally = Tally::default();
        for line in lines {
            let line_no = tally.lines + 1;
            let line = line.map_err(|source| AnalyzeError::SourceReadFailure {
                line: line_no,
                source,
            })?;
            tally.lines = line_no;

            if self.progress_interval > 0 && line_no % self.progress_interval == 0 {
                info!(
                    action = "progress",
                    component = "analysis",
                    lines = line_no,
                    "Processed lines"
                );
            }

            self.classify_line(line_no, &line, target_date, &mut tally)?;
        }

        let result = tally.finish();
        info!(
            action = "complete",
            component = "analysis",
            lines = result.total_lines_processed,
            daily_requests = result.daily_request_count,
            duration_ms = start_time.elapsed().as_millis(),
            "Log analysis completed"
        );
        Ok(result)
    }

    pub fn analyze_file(
        &self,
        path: &Path,
        target_date: &str,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let reader = open_log(path)?;
        self.analyze(LogLines::new(reader), target_date)
    }

    /// Sharded variant of [`Analyzer::analyze_file`]: the whole file is read
    /// first, then classified on `workers` threads and the shard tallies
    /// summed.
    pub fn analyze_file_parallel(
        &self,
        path: &Path,
        target_date: &str,
        workers: usize,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let start_time = Instant::now();
        let reader = open_log(path)?;

        let lines = LogLines::new(reader)
            .enumerate()
            .map(|(idx, line)| {
                line.map_err(|source| AnalyzeError::SourceReadFailure {
                    line: idx as u64 + 1,
                    source,
                })
            })
            .collect::<Result<Vec<String>, _>>()?;

        info!(
            action = "read",
            component = "sharded_analysis",
            lines = lines.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Read log into memory"
        );
        info!(
            action = "configure",
            component = "sharded_analysis",
            worker_count = workers,
            "Using workers for processing"
        );

        let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
        let processing_start = Instant::now();

        let tally = pool.install(|| {
            lines
                .par_iter()
                .enumerate()
                .try_fold(Tally::default, |mut acc, (idx, line)| {
                    acc.lines += 1;
                    self.classify_line(idx as u64 + 1, line, target_date, &mut acc)?;
                    Ok::<_, AnalyzeError>(acc)
                })
                .try_reduce(Tally::default, |a, b| Ok(a + b))
        })?;

        let result = tally.finish();
        info!(
            action = "complete",
            component = "sharded_analysis",
            lines = result.total_lines_processed,
            daily_requests = result.daily_request_count,
            processing_time_ms = processing_start.elapsed().as_millis(),
            total_time_ms = start_time.elapsed().as_millis(),
            "Sharded log analysis completed"
        );
        Ok(result)
    }
}

fn open_log(path: &Path) -> Result<BufReader<File>, AnalyzeError> {
    debug!(action = "open", component = "log_file", path = ?path, "Opening log file");
    let file = File::open(path).map_err(|source| AnalyzeError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Analyze `lines` with the default configuration.
pub fn analyze<I>(lines: I, target_date: &str) -> Result<AnalysisResult, AnalyzeError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    Analyzer::new(&AnalyzerConfig::default())?.analyze(lines, target_date)
}
