//! Inference with persisted artifacts.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use candle_core::{D, Device, Tensor};
use charcount_core::{
    CharCountError, CharCountModel, ModelConfig, TargetSet, TrainableModel, Vocab,
};
use tracing::warn;

use crate::artifacts::ArtifactPaths;

/// Strings the classifier is demonstrated on after training.
pub const REFERENCE_INPUTS: [&str; 4] = ["favfee", "wbsdfg", "rqwdbc", "nakbca"];

/// Result for one input string.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub input: String,
    pub predicted: u32,
    pub truth: u32,
    /// Largest raw logit. Not a probability.
    pub score: f32,
}

impl Prediction {
    pub fn is_correct(&self) -> bool {
        self.predicted == self.truth
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input: {}, predicted class: {}, true class: {}, prediction score: {:.6}",
            self.input, self.predicted, self.truth, self.score
        )
    }
}

pub struct Predictor {
    model: CharCountModel,
    vocab: Vocab,
    targets: TargetSet,
    device: Device,
}

impl Predictor {
    pub fn new(model: CharCountModel, vocab: Vocab, targets: TargetSet) -> Self {
        Self {
            model,
            vocab,
            targets,
            device: Device::Cpu,
        }
    }

    /// Load vocabulary, config, target set and weights from an artifact
    /// directory. A missing `config.json` or `targets.json` falls back to
    /// the defaults.
    pub fn load<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let paths = ArtifactPaths::new(dir);
        let device = Device::Cpu;

        let vocab = Vocab::load(paths.vocab())
            .with_context(|| format!("loading vocabulary from {}", paths.vocab().display()))?;

        let config = if paths.config().exists() {
            ModelConfig::load(paths.config())
                .with_context(|| format!("loading config from {}", paths.config().display()))?
        } else {
            warn!(
                "{} not found, assuming default architecture",
                paths.config().display()
            );
            ModelConfig::default()
        };

        let targets = if paths.targets().exists() {
            TargetSet::load(paths.targets())
                .with_context(|| format!("loading targets from {}", paths.targets().display()))?
        } else {
            warn!(
                "{} not found, assuming default targets",
                paths.targets().display()
            );
            TargetSet::default()
        };

        if config.vocab_size != vocab.len() {
            return Err(CharCountError::InvalidConfig(format!(
                "model expects {} tokens but the vocabulary has {}",
                config.vocab_size,
                vocab.len()
            ))
            .into());
        }
        if config.num_classes != targets.num_classes() {
            return Err(CharCountError::InvalidConfig(format!(
                "model has {} classes but {} targets give {} labels",
                config.num_classes,
                targets.len(),
                targets.num_classes()
            ))
            .into());
        }
        targets.validate(&vocab, config.sequence_length)?;

        let weights = paths.weights();
        if !weights.exists() {
            anyhow::bail!("Model weights not found: {}", weights.display());
        }

        let model = TrainableModel::load(config, &weights, &device)
            .with_context(|| format!("loading weights from {}", weights.display()))?
            .into_model();

        Ok(Self {
            model,
            vocab,
            targets,
            device,
        })
    }

    /// Classify each input. Every input must have exactly the model's
    /// sequence length and contain only vocabulary characters.
    pub fn predict<S: AsRef<str>>(&self, inputs: &[S]) -> anyhow::Result<Vec<Prediction>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<&str> = inputs.iter().map(|s| s.as_ref()).collect();
        let seq_len = self.model.config().sequence_length;
        let mut flat = Vec::with_capacity(inputs.len() * seq_len);
        let mut truths = Vec::with_capacity(inputs.len());

        for &input in &inputs {
            let encoded = self.vocab.encode_strict(input)?;
            if encoded.len() != seq_len {
                return Err(CharCountError::SequenceLength {
                    expected: seq_len,
                    actual: encoded.len(),
                    input: input.to_string(),
                }
                .into());
            }
            flat.extend(encoded);
            truths.push(self.targets.label_of(input));
        }

        let xs = Tensor::from_vec(flat, (inputs.len(), seq_len), &self.device)?;
        let logits = self.model.logits(&xs)?;
        let predicted = logits.argmax(D::Minus1)?.to_vec1::<u32>()?;
        let scores = logits.max(D::Minus1)?.to_vec1::<f32>()?;

        Ok(inputs
            .iter()
            .zip(truths)
            .zip(predicted.into_iter().zip(scores))
            .map(|((input, truth), (predicted, score))| Prediction {
                input: input.to_string(),
                predicted,
                truth,
                score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charcount_core::{SeededRng, TrainingConfig};

    use crate::trainer::Trainer;

    fn predictor(seed: u64) -> Predictor {
        let trainable = TrainableModel::new(
            ModelConfig::default(),
            &mut SeededRng::new(seed),
            &Device::Cpu,
        )
        .unwrap();
        Predictor::new(
            trainable.model().clone(),
            Vocab::build(),
            TargetSet::default(),
        )
    }

    #[test]
    fn test_reference_truths() {
        let predictions = predictor(1).predict(&REFERENCE_INPUTS).unwrap();
        let truths: Vec<u32> = predictions.iter().map(|p| p.truth).collect();
        assert_eq!(truths, vec![1, 1, 2, 3]);
        assert!(predictions.iter().all(|p| p.predicted < 4));
        assert!(predictions.iter().all(|p| p.score.is_finite()));
    }

    #[test]
    fn test_unknown_character_is_rejected() {
        let err = predictor(1).predict(&["abc1ef"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CharCountError>(),
            Some(CharCountError::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let err = predictor(1).predict(&["abc"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CharCountError>(),
            Some(CharCountError::SequenceLength { actual: 3, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let inputs: [&str; 0] = [];
        assert!(predictor(1).predict(&inputs).unwrap().is_empty());
    }

    #[test]
    fn test_display() {
        let p = Prediction {
            input: "nakbca".into(),
            predicted: 3,
            truth: 3,
            score: 2.5,
        };
        assert!(p.is_correct());
        assert_eq!(
            p.to_string(),
            "input: nakbca, predicted class: 3, true class: 3, prediction score: 2.500000"
        );
    }

    #[test]
    fn test_load_from_trained_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainingConfig {
            epochs: 1,
            seed: Some(17),
            ..Default::default()
        };
        crate::trainer::run_training(ModelConfig::default(), config, dir.path()).unwrap();

        let predictor = Predictor::load(dir.path()).unwrap();
        let predictions = predictor.predict(&REFERENCE_INPUTS).unwrap();
        assert_eq!(predictions.len(), 4);
        assert_eq!(predictions[3].truth, 3);
    }

    #[test]
    fn test_load_missing_weights() {
        let dir = tempfile::tempdir().unwrap();
        Vocab::build().save(dir.path().join("vocab.json")).unwrap();
        assert!(Predictor::load(dir.path()).is_err());
    }

    #[test]
    fn test_load_uses_saved_targets() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = Trainer::with_targets(
            ModelConfig::default(),
            TrainingConfig {
                epochs: 0,
                seed: Some(21),
                ..Default::default()
            },
            TargetSet::new(['x', 'y', 'z']),
        )
        .unwrap();
        trainer.save(dir.path()).unwrap();

        let predictor = Predictor::load(dir.path()).unwrap();
        let predictions = predictor.predict(&["xyzxyz", "abcabc"]).unwrap();
        assert_eq!(predictions[0].truth, 3);
        assert_eq!(predictions[1].truth, 0);
    }

    #[test]
    fn test_load_rejects_class_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(
            ModelConfig::default(),
            TrainingConfig {
                epochs: 0,
                seed: Some(4),
                ..Default::default()
            },
        )
        .unwrap();
        let paths = trainer.save(dir.path()).unwrap();
        TargetSet::new(['a', 'b']).save(paths.targets()).unwrap();

        let err = Predictor::load(dir.path()).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<CharCountError>(),
            Some(CharCountError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_rejects_weight_shape_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(
            ModelConfig::default(),
            TrainingConfig {
                epochs: 0,
                seed: Some(6),
                ..Default::default()
            },
        )
        .unwrap();
        let paths = trainer.save(dir.path()).unwrap();
        ModelConfig {
            vector_dim: 32,
            ..Default::default()
        }
        .save(paths.config())
        .unwrap();

        assert!(Predictor::load(dir.path()).is_err());
    }

    #[test]
    fn test_load_without_optional_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(
            ModelConfig::default(),
            TrainingConfig {
                epochs: 0,
                seed: Some(8),
                ..Default::default()
            },
        )
        .unwrap();
        let paths = trainer.save(dir.path()).unwrap();
        std::fs::remove_file(paths.config()).unwrap();
        std::fs::remove_file(paths.targets()).unwrap();

        let predictor = Predictor::load(dir.path()).unwrap();
        let predictions = predictor.predict(&REFERENCE_INPUTS).unwrap();
        assert_eq!(predictions[2].truth, 2);
    }
}
