//! Model and training hyperparameters.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Architecture hyperparameters. Weights can only be loaded into a model
/// built from the same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub vector_dim: usize,
    pub sequence_length: usize,
    pub vocab_size: usize,
    pub num_classes: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            vector_dim: 20,
            sequence_length: 6,
            vocab_size: 27,
            num_classes: 4,
        }
    }
}

impl ModelConfig {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Optimization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub train_samples: usize,
    pub eval_samples: usize,
    pub learning_rate: f64,
    /// `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 20,
            batch_size: 20,
            train_samples: 500,
            eval_samples: 200,
            learning_rate: 0.005,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Number of full batches per epoch. A trailing partial batch is skipped.
    pub fn batches_per_epoch(&self) -> usize {
        if self.batch_size == 0 {
            return 0;
        }
        self.train_samples / self.batch_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let model = ModelConfig::default();
        assert_eq!(model.vector_dim, 20);
        assert_eq!(model.vocab_size, 27);

        let training = TrainingConfig::default();
        assert_eq!(training.batches_per_epoch(), 25);
        assert_eq!(
            TrainingConfig {
                batch_size: 0,
                ..training
            }
            .batches_per_epoch(),
            0
        );
    }

    #[test]
    fn test_model_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = ModelConfig {
            vector_dim: 8,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ModelConfig::load(&path).unwrap(), config);
    }
}
