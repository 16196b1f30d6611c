use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use mutrate::{EstimationOptions, RateEstimator, SolverOptions};

/// Estimate per-replication mutation rates from a `name,f,N` table.
#[derive(Parser, Debug)]
#[command(name = "mutrate", version, about)]
struct Cli {
    /// Input table with the columns name, f, N
    #[arg(default_value = "input.csv")]
    input: PathBuf,

    /// Output path; defaults to `<input stem>_output_file.csv` next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum solver iterations per sample
    #[arg(long, default_value_t = SolverOptions::default().max_iterations)]
    max_iterations: usize,

    /// Convergence threshold is min(f, N) divided by this value
    #[arg(
        long,
        default_value_t = SolverOptions::default().threshold_divisor,
        value_parser = positive_finite
    )]
    threshold_divisor: f64,

    /// Starting guess is f divided by this value
    #[arg(
        long,
        default_value_t = SolverOptions::default().initial_divisor,
        value_parser = positive_finite
    )]
    initial_divisor: f64,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn positive_finite(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive finite number, found {value}"))
    }
}

impl Cli {
    fn options(&self) -> EstimationOptions {
        EstimationOptions::default().with_solver(
            SolverOptions::default()
                .with_max_iterations(self.max_iterations)
                .with_threshold_divisor(self.threshold_divisor)
                .with_initial_divisor(self.initial_divisor),
        )
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let estimator = RateEstimator::new(cli.options());
    let report = estimator
        .process_file(&cli.input, cli.output.as_deref())
        .with_context(|| format!("failed to process {}", cli.input.display()))?;
    println!("\nThe results are in the file {}\n", report.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
