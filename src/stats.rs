use serde::Serialize;
use std::ops::{Add, AddAssign};

/// Running counters for one analysis pass, or one shard of it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub lines: u64,
    pub https_domain_referers: u64,
    pub daily_requests: u64,
    pub daily_successes: u64,
}

impl Tally {
    pub fn finish(self) -> AnalysisResult {
        let success_ratio_percent = if self.daily_requests > 0 {
            self.daily_successes as f64 / self.daily_requests as f64 * 100.0
        } else {
            0.0
        };

        AnalysisResult {
            total_lines_processed: self.lines,
            https_domain_refer_count: self.https_domain_referers,
            daily_request_count: self.daily_requests,
            daily_success_count: self.daily_successes,
            success_ratio_percent,
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Self) {
        self.lines += other.lines;
        self.https_domain_referers += other.https_domain_referers;
        self.daily_requests += other.daily_requests;
        self.daily_successes += other.daily_successes;
    }
}

impl Add for Tally {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub total_lines_processed: u64,
    pub https_domain_refer_count: u64,
    pub daily_request_count: u64,
    pub daily_success_count: u64,
    pub success_ratio_percent: f64,
}
