//! charcount CLI
//!
//! Trains the character-counting classifier and runs predictions with the
//! saved artifacts.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use charcount_core::{ModelConfig, TrainingConfig};
use charcount_trainer::artifacts::DEFAULT_DIR;
use charcount_trainer::{Predictor, REFERENCE_INPUTS, run_training};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "charcount")]
#[command(about = "Train and query a classifier that counts target characters")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model and write its artifacts
    Train {
        #[command(flatten)]
        train: TrainArgs,
    },
    /// Predict labels for strings using saved artifacts
    Predict {
        /// Artifact directory to load from
        #[arg(short, long, env = "CHARCOUNT_ARTIFACTS", default_value = DEFAULT_DIR)]
        model_dir: PathBuf,

        /// Strings to classify (defaults to the reference strings)
        inputs: Vec<String>,
    },
    /// Train, then predict on the reference strings
    Run {
        #[command(flatten)]
        train: TrainArgs,
    },
}

#[derive(Args)]
struct TrainArgs {
    /// Number of training epochs
    #[arg(long, default_value_t = 20)]
    epochs: usize,

    /// Samples per gradient step
    #[arg(long, default_value_t = 20)]
    batch_size: usize,

    /// Size of the balanced training set
    #[arg(long, default_value_t = 500)]
    train_samples: usize,

    /// Size of each evaluation set
    #[arg(long, default_value_t = 200)]
    eval_samples: usize,

    /// Optimizer learning rate
    #[arg(long, default_value_t = 0.005)]
    learning_rate: f64,

    /// Seed for data generation and weight init (clock-seeded if omitted)
    #[arg(long, env = "CHARCOUNT_SEED")]
    seed: Option<u64>,

    /// Output directory for artifacts
    #[arg(short, long, env = "CHARCOUNT_ARTIFACTS", default_value = DEFAULT_DIR)]
    out: PathBuf,
}

impl TrainArgs {
    fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            epochs: self.epochs,
            batch_size: self.batch_size,
            train_samples: self.train_samples,
            eval_samples: self.eval_samples,
            learning_rate: self.learning_rate,
            seed: self.seed,
        }
    }
}

fn train(args: &TrainArgs) -> Result<()> {
    let history = run_training(ModelConfig::default(), args.training_config(), &args.out)?;
    if let Some(last) = history.last() {
        info!(
            "Final epoch {}: accuracy {:.2}%, mean loss {:.6}",
            last.epoch,
            last.accuracy * 100.0,
            last.mean_loss
        );
    }
    Ok(())
}

fn predict(model_dir: &Path, inputs: &[String]) -> Result<()> {
    let predictor = Predictor::load(model_dir)?;

    let predictions = if inputs.is_empty() {
        predictor.predict(&REFERENCE_INPUTS)?
    } else {
        predictor.predict(inputs)?
    };

    for prediction in &predictions {
        println!("{prediction}");
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Train { train: args } => train(&args),
        Commands::Predict { model_dir, inputs } => predict(&model_dir, &inputs),
        Commands::Run { train: args } => {
            train(&args)?;
            predict(&args.out, &[])
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("charcount failed: {:#}", e);
        std::process::exit(1);
    }
}
