//! Functional-bootstrapping precision harness
//!
//! # Usage
//!
//! ```bash
//! # List every catalog
//! fdfb list
//!
//! # Run entry 12 of the function-evaluation catalog
//! fdfb eval 12
//!
//! # Approximate entry with uniform inputs, chained three times
//! fdfb eval 71 --uniform --iterations 3
//!
//! # Decompose 2^24-modulus inputs with HomDecomp-Reduce
//! fdfb decomp 2 24
//!
//! # Entries 0 to 33 on four threads
//! fdfb sweep 0 33 --threads 4
//! ```
//!
//! Exit status is 0 when every trial passed, 1 when some failed and 2 on errors.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use fdfb::{Catalog, InputMode, RunConfig};

mod commands;
mod logging;

use commands::Session;

#[derive(Parser)]
#[command(name = "fdfb")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Precision harness for functional bootstrapping", long_about = None)]
struct Cli {
    /// Path to a TOML run configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Number of trials
    #[arg(long, global = true)]
    trials: Option<usize>,

    /// Evaluations chained on each input
    #[arg(long, global = true)]
    iterations: Option<usize>,

    /// Seed for inputs, lookup tables and keys
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Draw approximate inputs uniformly instead of sweeping the range
    #[arg(long, global = true, conflicts_with = "fixed")]
    uniform: bool,

    /// Use the same real input for every trial
    #[arg(long, global = true, allow_hyphen_values = true)]
    fixed: Option<f64>,

    /// Extract approximate inputs from the large domain
    #[arg(long, global = true)]
    extracted: bool,

    /// Only print the summary
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every catalog with its indices
    List,

    /// Run one function-evaluation entry; without an index, print the catalog
    Eval { index: Option<usize> },

    /// Decompose inputs of modulus 2^LOG_Q_IN
    Decomp { index: usize, log_q_in: u32 },

    /// Run one ReLU entry; without an index, print the catalogs
    Relu { index: Option<usize> },

    /// Run a range of function-evaluation entries
    Sweep {
        from: usize,
        to: usize,

        /// Worker threads
        #[arg(long)]
        threads: Option<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_level) {
        eprintln!("error: {e:#}");
        return ExitCode::from(2);
    }

    let result: anyhow::Result<bool> = run(cli);
    if let Err(e) = &result {
        eprintln!("error: {e:#}");
    }
    ExitCode::from(status(&result))
}

/// 0 when every trial passed, 1 when some failed, 2 on errors.
fn status(result: &anyhow::Result<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let config: RunConfig = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    let mut options = config.run_options();
    if let Some(trials) = cli.trials {
        options.trials = Some(trials);
    }
    if let Some(iterations) = cli.iterations {
        anyhow::ensure!(iterations > 0, "--iterations must be at least 1");
        options.eval_iterations = iterations;
    }
    if cli.seed.is_some() {
        options.seed = cli.seed;
    }
    if cli.uniform {
        options.input_mode = InputMode::Uniform;
    }
    if let Some(x) = cli.fixed {
        options.input_mode = InputMode::Fixed(x);
    }
    options.extracted |= cli.extracted;

    let catalog: Catalog = Catalog::function_evaluation()
        .clone()
        .with_section("configuration file", config.user_configurations()?);

    let threads: usize = match &cli.command {
        Commands::Sweep { threads: Some(threads), .. } => *threads,
        _ => config.threads,
    };

    tracing::debug!(?options, threads, entries = catalog.len(), "resolved run options");

    let session: Session = Session {
        catalog,
        options,
        threads,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::List | Commands::Eval { index: None } | Commands::Relu { index: None } => Ok(session.list()),
        Commands::Eval { index: Some(index) } => session.eval(index),
        Commands::Decomp { index, log_q_in } => session.decomp(index, log_q_in),
        Commands::Relu { index: Some(index) } => session.relu(index),
        Commands::Sweep { from, to, .. } => session.sweep(from, to),
    }
}
