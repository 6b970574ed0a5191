use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::stats::AnalysisResult;
use crate::utils::format_number;

/// What was analyzed, for the report headers.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub log_file: &'a Path,
    pub target_date: &'a str,
    pub domain: &'a str,
}

fn write_metrics<W: Write>(
    out: &mut W,
    result: &AnalysisResult,
    ctx: &ReportContext<'_>,
) -> std::io::Result<()> {
    writeln!(
        out,
        "Total lines processed: {}",
        format_number(result.total_lines_processed)
    )?;
    writeln!(
        out,
        "HTTPS requests referred by {}: {}",
        ctx.domain,
        format_number(result.https_domain_refer_count)
    )?;
    writeln!(
        out,
        "Total requests on {}: {}",
        ctx.target_date,
        format_number(result.daily_request_count)
    )?;
    writeln!(
        out,
        "Successful requests on {}: {}",
        ctx.target_date,
        format_number(result.daily_success_count)
    )?;
    writeln!(out, "Success ratio: {:.2}%", result.success_ratio_percent)
}

pub fn print_analysis_results<W: Write>(
    out: &mut W,
    result: &AnalysisResult,
    ctx: &ReportContext<'_>,
) -> std::io::Result<()> {
    let rule = "=".repeat(50);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "Analysis results")?;
    writeln!(out, "{rule}")?;
    write_metrics(out, result, ctx)
}

pub fn print_json<W: Write>(out: &mut W, result: &AnalysisResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, result).context("Failed to serialize results")?;
    writeln!(out)?;
    Ok(())
}

pub fn write_results<W: Write>(
    out: &mut W,
    result: &AnalysisResult,
    ctx: &ReportContext<'_>,
    generated_at: DateTime<Local>,
) -> std::io::Result<()> {
    writeln!(out, "Nginx log analysis results")?;
    writeln!(out, "{}", "=".repeat(30))?;
    writeln!(out, "Analyzed at: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "Log file: {}", ctx.log_file.display())?;
    writeln!(out, "Target date: {}", ctx.target_date)?;
    writeln!(out)?;
    write_metrics(out, result, ctx)
}

pub fn write_results_file(
    path: &Path,
    result: &AnalysisResult,
    ctx: &ReportContext<'_>,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create results file {path:?}"))?;
    let mut out = BufWriter::new(file);
    write_results(&mut out, result, ctx, Local::now())
        .and_then(|()| out.flush())
        .with_context(|| format!("Failed to write results file {path:?}"))?;

    info!(action = "write", component = "results_file", path = ?path, "Results written");
    Ok(())
}
