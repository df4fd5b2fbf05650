//! # charcount Trainer
//!
//! Training, evaluation and prediction for the charcount classifier. Trains
//! on a balanced synthetic dataset, writes weights, vocabulary, config and
//! per-epoch history into an artifact directory, and reloads them for
//! inference.

pub mod artifacts;
pub mod history;
pub mod predictor;
pub mod trainer;

pub use artifacts::ArtifactPaths;
pub use history::{EpochRecord, TrainingHistory};
pub use predictor::{Prediction, Predictor, REFERENCE_INPUTS};
pub use trainer::{EvalReport, Trainer, run_training};
