use anyhow::{Context, Result};
use clap::Parser;
use digit_nn::config::{load_config, TrainingConfig};
use digit_nn::data::load_mnist;
use digit_nn::training;
use digit_nn::utils::SimpleRng;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

// Two-layer sigmoid network on MNIST, trained full-batch with conjugate gradient.
#[derive(Parser, Debug)]
#[command(name = "mnist_nn")]
#[command(about = "Train a one-hidden-layer network on MNIST and report accuracy", long_about = None)]
struct Cli {
    /// JSON training config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the four MNIST IDX files
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Hidden units (overrides the config)
    #[arg(long)]
    hidden: Option<usize>,

    /// Regularization strength (overrides the config)
    #[arg(long)]
    lambda: Option<f64>,

    /// Optimizer iteration budget (overrides the config)
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Weight initialization seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level: error, warn, info, debug or trace
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

/// Config file (or defaults) with command-line overrides applied, validated.
fn resolve_config(cli: &Cli) -> Result<TrainingConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TrainingConfig::default(),
    };

    if let Some(hidden) = cli.hidden {
        config.n_hidden = hidden;
    }
    if let Some(lambda) = cli.lambda {
        config.lambda = lambda;
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    config.validate()?;
    Ok(config)
}

fn seeded_rng(config: &TrainingConfig) -> SimpleRng {
    match config.seed {
        Some(seed) => SimpleRng::new(seed),
        None => {
            let (rng, seed) = SimpleRng::from_time();
            info!(seed, "no seed configured, seeding from the clock");
            rng
        }
    }
}

fn report_line(split: &str, accuracy: f64) -> String {
    format!("{} set Accuracy: {}%", split, accuracy)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let program_start = Instant::now();
    let config = resolve_config(&cli)?;

    let load_start = Instant::now();
    let splits = load_mnist(&cli.data_dir, &config.preprocess_options())
        .with_context(|| format!("failed to load MNIST from {}", cli.data_dir.display()))?;
    let load_time = load_start.elapsed().as_secs_f64();

    let mut rng = seeded_rng(&config);

    let train_start = Instant::now();
    let (model, report) = training::run(&config, &splits, &mut rng)?;
    let train_time = train_start.elapsed().as_secs_f64();

    info!(
        iterations = model.optimization.iterations,
        evaluations = model.optimization.evaluations,
        loss = model.optimization.loss,
        converged = model.optimization.converged,
        "optimizer finished"
    );

    println!();
    println!("{}", report_line("Training", report.train));
    println!("{}", report_line("Validation", report.validation));
    println!("{}", report_line("Test", report.test));

    info!(
        load_secs = load_time,
        train_secs = train_time,
        total_secs = program_start.elapsed().as_secs_f64(),
        "done"
    );
    Ok(())
}
