//! Console front end: generate sample data, evaluate formulas, print previews.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use parmat::formula::{Evaluator, Formula, Strategy};
use parmat::matrix::data::{DEFAULT_HIGH, DEFAULT_LOW, DEFAULT_SIZE};
use parmat::matrix::{MatrixPreview, SampleData};
use parmat::runtime::{DEFAULT_WORKERS, ParallelismConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "parmat", version, about = "Parallel dense-matrix formula engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random sample data set and write it as JSON
    Generate {
        /// Side length of each square matrix
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
        /// Inclusive lower bound of generated values
        #[arg(long, default_value_t = DEFAULT_LOW)]
        low: f64,
        /// Exclusive upper bound of generated values
        #[arg(long, default_value_t = DEFAULT_HIGH)]
        high: f64,
        /// Seed for reproducible data; random if omitted
        #[arg(long)]
        seed: Option<u64>,
        /// Output file
        #[arg(long, default_value = "data.json")]
        out: PathBuf,
    },
    /// Evaluate formulas over a sample data set
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Sample data JSON file
    #[arg(long, default_value = "data.json")]
    data: PathBuf,
    /// Workers per matrix operation
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,
    /// Size of a dedicated rayon pool; the global pool is used if omitted
    #[arg(long)]
    pool_threads: Option<usize>,
    /// Strategy to run; every strategy if omitted
    #[arg(long)]
    strategy: Option<Strategy>,
    /// Formula to evaluate; both if omitted
    #[arg(long)]
    formula: Option<Formula>,
    /// Rows and columns shown per result
    #[arg(long, default_value_t = 5)]
    preview: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            size,
            low,
            high,
            seed,
            out,
        } => generate(size, low, high, seed, &out),
        Commands::Run(args) => run(&args),
    }
}

fn generate(size: usize, low: f64, high: f64, seed: Option<u64>, out: &Path) -> Result<()> {
    let data = match seed {
        Some(seed) => SampleData::generate_seeded(size, low, high, seed),
        None => SampleData::generate(size, low, high, &mut rand::rng()),
    }
    .context("failed to generate sample data")?;

    data.save_json(out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("Wrote {size}x{size} sample data to {}", out.display());
    Ok(())
}

fn run(args: &RunArgs) -> Result<()> {
    let data = SampleData::load_json(&args.data)
        .with_context(|| format!("failed to load {}", args.data.display()))?;
    println!("DataSet: {} ({n}x{n})", args.data.display(), n = data.size());

    let config = ParallelismConfig::new(args.workers).with_pool_threads(args.pool_threads);
    let strategies = match args.strategy {
        Some(strategy) => vec![strategy],
        None => Strategy::ALL.to_vec(),
    };
    let formulas = match args.formula {
        Some(formula) => vec![formula],
        None => Formula::ALL.to_vec(),
    };

    for strategy in strategies {
        let evaluator = Evaluator::new(strategy, &config)
            .with_context(|| format!("failed to set up {strategy} evaluator"))?;
        for &formula in &formulas {
            let result = evaluator
                .evaluate(formula, &data)
                .with_context(|| format!("formula {formula} failed under {strategy}"))?;
            let title = format!(
                "Formula {} [{strategy}]: {}",
                formula.to_string().to_uppercase(),
                formula.expression()
            );
            println!("{}", MatrixPreview::new(&result, args.preview, &title));
        }
    }
    Ok(())
}
