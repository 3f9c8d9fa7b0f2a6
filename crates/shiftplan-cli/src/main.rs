//! shiftplan CLI - Workforce Shift-Scheduling Optimizer
//!
//! Reads a scheduling request (forecast + roster) as JSON, solves it and
//! writes the result payload as JSON.

mod exit;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shiftplan_core::{EngineConfig, ScheduleInput, SolverStrategy};
use shiftplan_solver::precheck::find_infeasibility;
use shiftplan_solver::{ShiftEngine, ShiftModel};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::exit::ExitCode;

#[derive(Parser)]
#[command(name = "shiftplan")]
#[command(author, version, about = "Workforce shift-scheduling optimizer", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a scheduling request
    Solve {
        /// Request file (JSON with `forecast` and `employees`)
        #[arg(value_name = "REQUEST")]
        file: PathBuf,

        /// Engine configuration (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Search strategy (exact, heuristic, cp, portfolio)
        #[arg(short, long)]
        strategy: Option<SolverStrategy>,

        /// Wall-clock limit for the search in milliseconds
        #[arg(long, value_name = "MS")]
        time_limit_ms: Option<u64>,

        /// Merge consecutive hours into one shift
        #[arg(long)]
        merge_shifts: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a scheduling request and summarize it
    Check {
        /// Request file (JSON with `forecast` and `employees`)
        #[arg(value_name = "REQUEST")]
        file: PathBuf,

        /// Engine configuration (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_toml_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn read_request(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn cmd_solve(
    file: &Path,
    config: Option<&Path>,
    strategy: Option<SolverStrategy>,
    time_limit_ms: Option<u64>,
    merge_shifts: bool,
    output: Option<&Path>,
    pretty: bool,
) -> Result<ExitCode> {
    let mut config = load_config(config)?;
    if let Some(strategy) = strategy {
        config.strategy = strategy;
    }
    if let Some(ms) = time_limit_ms {
        config.time_limit_ms = Some(ms);
    }
    if merge_shifts {
        config.merge_contiguous_shifts = true;
    }

    let body = read_request(file)?;
    let engine = ShiftEngine::new(config)?;
    let result = engine
        .solve_json(&body)
        .with_context(|| format!("failed to schedule {}", file.display()))?;

    let json = if pretty {
        result.to_json_pretty()?
    } else {
        result.to_json()?
    };
    match output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    info!(
        strategy = engine.solver_name(),
        success = result.is_success(),
        "done"
    );
    Ok(ExitCode::from_result(&result))
}

fn cmd_check(file: &Path, config: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config)?;
    let body = read_request(file)?;
    let problem = ScheduleInput::from_json(&body)
        .and_then(|input| input.validate(&config))
        .with_context(|| format!("invalid request {}", file.display()))?;
    let model = ShiftModel::build(&problem, config.cost_scale())?;

    println!("{}", file.display());
    println!("  slots:        {}", problem.forecast.len());
    println!("  employees:    {}", problem.employees.len());
    println!("  staff-hours:  {}", problem.total_demand());
    println!("  eligible:     {} of {} pairs", model.variables.free_count(), model.variables.len());

    match find_infeasibility(&model) {
        Some(reason) => {
            println!("  pre-check:    {}", reason);
            Ok(ExitCode::Infeasible)
        }
        None => {
            println!("  pre-check:    ok");
            Ok(ExitCode::Success)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Solve {
            file,
            config,
            strategy,
            time_limit_ms,
            merge_shifts,
            output,
            pretty,
        } => cmd_solve(
            &file,
            config.as_deref(),
            strategy,
            time_limit_ms,
            merge_shifts,
            output.as_deref(),
            pretty,
        ),
        Commands::Check { file, config } => cmd_check(&file, config.as_deref()),
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::Error.into()
        }
    }
}
