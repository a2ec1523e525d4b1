use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use finscen::{Overrides, init_logging, load_request, write_report};
use finscen_core::analysis::ScenarioAnalysis;
use finscen_core::model::AnalysisProgress;

#[derive(Parser, Debug)]
#[command(name = "finscen")]
#[command(about = "Scenario-based Monte Carlo analysis")]
struct Args {
    /// Analysis request file (.json, .yaml or .yml)
    request: PathBuf,

    /// Analysis seed, overriding the request
    #[arg(short, long)]
    seed: Option<u64>,

    /// Draws per scenario, overriding the request
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Wall-clock budget in milliseconds, overriding the request
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    let mut config = load_request(&args.request)
        .wrap_err_with(|| format!("Failed to load request {}", args.request.display()))?;
    Overrides {
        seed: args.seed,
        iterations: args.iterations,
        timeout_ms: args.timeout_ms,
    }
    .apply(&mut config);

    let progress = AnalysisProgress::new();
    let mut analysis = ScenarioAnalysis::new(config);
    let report = analysis
        .run(&progress)
        .wrap_err("Scenario analysis failed")?;

    tracing::info!(
        seed = report.seed,
        scenarios = report.scenarios.len(),
        draws = progress.completed(),
        "analysis finished"
    );

    write_report(report, args.output.as_deref(), args.pretty).wrap_err("Failed to write report")?;
    Ok(())
}
