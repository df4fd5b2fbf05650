//! Training loop for the character-counting classifier.

use std::fs;
use std::path::Path;

use anyhow::Context;
use candle_core::Device;
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use charcount_core::{
    CharCountError, DatasetBuilder, LabelDistribution, ModelConfig, SampleGenerator, SeededRng,
    TargetSet, TrainableModel, TrainingConfig, Vocab,
};
use tracing::{debug, info};

use crate::artifacts::ArtifactPaths;
use crate::history::{EpochRecord, TrainingHistory};

/// Outcome of one evaluation pass.
#[derive(Debug, Clone)]
pub struct EvalReport {
    pub correct: usize,
    pub total: usize,
    pub accuracy: f32,
    pub distribution: LabelDistribution,
}

pub struct Trainer {
    model: TrainableModel,
    vocab: Vocab,
    targets: TargetSet,
    config: TrainingConfig,
    rng: SeededRng,
    device: Device,
}

impl Trainer {
    pub fn new(model_config: ModelConfig, config: TrainingConfig) -> anyhow::Result<Self> {
        Self::with_targets(model_config, config, TargetSet::default())
    }

    /// Build a trainer for an arbitrary target set. The model must have one
    /// output class per possible label and one embedding row per token.
    pub fn with_targets(
        model_config: ModelConfig,
        config: TrainingConfig,
        targets: TargetSet,
    ) -> anyhow::Result<Self> {
        let vocab = Vocab::build();
        if model_config.vocab_size != vocab.len() {
            return Err(CharCountError::InvalidConfig(format!(
                "vocab_size is {} but the vocabulary has {} entries",
                model_config.vocab_size,
                vocab.len()
            ))
            .into());
        }
        if model_config.num_classes != targets.num_classes() {
            return Err(CharCountError::InvalidConfig(format!(
                "num_classes is {} but {} targets give {} labels",
                model_config.num_classes,
                targets.len(),
                targets.num_classes()
            ))
            .into());
        }

        targets.validate(&vocab, model_config.sequence_length)?;

        let device = Device::Cpu;
        let mut rng = SeededRng::seeded_or_entropy(config.seed);
        let model = TrainableModel::new(model_config, &mut rng, &device)?;

        Ok(Self {
            model,
            vocab,
            targets,
            config,
            rng,
            device,
        })
    }

    pub fn model(&self) -> &TrainableModel {
        &self.model
    }

    pub fn vocab(&self) -> &Vocab {
        &self.vocab
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    fn sequence_length(&self) -> usize {
        self.model.model().config().sequence_length
    }

    /// Train on one balanced dataset for the configured number of epochs,
    /// evaluating on fresh data after each epoch.
    pub fn train(&mut self) -> anyhow::Result<TrainingHistory> {
        let generator = SampleGenerator::new(&self.targets, &self.vocab, self.sequence_length())?;
        let builder = DatasetBuilder::new(generator);

        info!("train set label distribution");
        let (train_set, _) =
            builder.build_logged("train", self.config.train_samples, true, &mut self.rng);

        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            weight_decay: 0.0,
            ..Default::default()
        };
        let mut optimizer = AdamW::new(self.model.varmap().all_vars(), params)?;

        let batches = self.config.batches_per_epoch();
        let batch_size = self.config.batch_size;
        let mut history = TrainingHistory::default();

        for epoch in 0..self.config.epochs {
            let mut losses = Vec::with_capacity(batches);

            for batch in 0..batches {
                let (xs, ys) = train_set.batch(batch * batch_size, batch_size, &self.device)?;
                let model = self.model.model();
                let logits = model.logits(&xs)?;
                let loss = model.loss(&logits, &ys)?;

                let value = loss.to_scalar::<f32>()?;
                if !value.is_finite() {
                    return Err(CharCountError::NonFiniteLoss {
                        loss: value,
                        epoch: epoch + 1,
                        batch: batch + 1,
                    }
                    .into());
                }

                optimizer.backward_step(&loss)?;
                losses.push(value);
                debug!(epoch = epoch + 1, batch = batch + 1, loss = value, "step");
            }

            let mean_loss = if losses.is_empty() {
                0.0
            } else {
                losses.iter().sum::<f32>() / losses.len() as f32
            };
            info!(
                "Epoch {}/{} - mean loss: {:.6}",
                epoch + 1,
                self.config.epochs,
                mean_loss
            );

            let report = self.evaluate()?;
            history.push(EpochRecord {
                epoch: epoch + 1,
                accuracy: report.accuracy,
                mean_loss,
            });
        }

        Ok(history)
    }

    /// Accuracy on a freshly generated, unbalanced evaluation set.
    pub fn evaluate(&mut self) -> anyhow::Result<EvalReport> {
        let generator = SampleGenerator::new(&self.targets, &self.vocab, self.sequence_length())?;
        let builder = DatasetBuilder::new(generator);
        let (eval_set, distribution) =
            builder.build_logged("eval", self.config.eval_samples, false, &mut self.rng);

        let (xs, _) = eval_set.to_tensors(&self.device)?;
        let predictions = self.model.model().predict(&xs)?;

        let correct = predictions
            .iter()
            .zip(eval_set.labels())
            .filter(|(pred, truth)| **pred == *truth)
            .count();
        let total = eval_set.len();
        let accuracy = if total > 0 {
            correct as f32 / total as f32
        } else {
            0.0
        };

        info!(
            "Correct predictions: {}/{}, accuracy: {:.2}%, label counts: {:?}",
            correct,
            total,
            accuracy * 100.0,
            distribution.counts()
        );

        Ok(EvalReport {
            correct,
            total,
            accuracy,
            distribution,
        })
    }

    /// Write weights, vocabulary, model config and target set into `dir`.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> anyhow::Result<ArtifactPaths> {
        let paths = ArtifactPaths::new(dir);
        fs::create_dir_all(paths.dir())
            .with_context(|| format!("creating {}", paths.dir().display()))?;

        self.model
            .save(paths.weights())
            .with_context(|| format!("writing {}", paths.weights().display()))?;
        self.vocab
            .save(paths.vocab())
            .with_context(|| format!("writing {}", paths.vocab().display()))?;
        self.model
            .model()
            .config()
            .save(paths.config())
            .with_context(|| format!("writing {}", paths.config().display()))?;
        self.targets
            .save(paths.targets())
            .with_context(|| format!("writing {}", paths.targets().display()))?;

        info!("Model saved to {:?}", paths.dir());
        Ok(paths)
    }
}

/// Train with the given settings and write all artifacts into `out_dir`.
pub fn run_training<P: AsRef<Path>>(
    model_config: ModelConfig,
    config: TrainingConfig,
    out_dir: P,
) -> anyhow::Result<TrainingHistory> {
    info!(?config, "Starting training");
    let mut trainer = Trainer::new(model_config, config)?;
    let history = trainer.train()?;

    let paths = trainer.save(out_dir)?;
    history
        .save(paths.history())
        .with_context(|| format!("writing {}", paths.history().display()))?;

    if let Some(best) = history.best_accuracy() {
        info!(
            "Best accuracy {:.2}% at epoch {}",
            best.accuracy * 100.0,
            best.epoch
        );
    }

    Ok(history)
}
