use anyhow::Result;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{error, info};

use logtally::report::{self, ReportContext};
use logtally::{date, utils, AnalysisResult, Analyzer, Args, OutputFormat};

fn run(args: &Args) -> Result<AnalysisResult> {
    utils::validate_args(args)?;
    date::validate_target_date(&args.target_date)?;

    info!(
        action = "start",
        component = "cli",
        log_file = ?args.log_file,
        target_date = %args.target_date,
        "Analyzing log file"
    );

    let analyzer = Analyzer::new(&args.analyzer_config())?;
    let result = match args.worker_count() {
        Some(workers) => analyzer.analyze_file_parallel(&args.log_file, &args.target_date, workers)?,
        None => analyzer.analyze_file(&args.log_file, &args.target_date)?,
    };

    let ctx = ReportContext {
        log_file: &args.log_file,
        target_date: &args.target_date,
        domain: &args.domain,
    };

    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Text => report::print_analysis_results(&mut stdout, &result, &ctx)?,
        OutputFormat::Json => report::print_json(&mut stdout, &result)?,
    }

    if !args.no_output_file {
        report::write_results_file(&args.output, &result, &ctx)?;
    }

    Ok(result)
}

fn main() -> ExitCode {
    let args = Args::parse();
    utils::setup_logging(args.verbose);

    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(action = "fail", component = "cli", error = %e, "Analysis failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
