use candle_core::{D, Tensor};
use candle_nn::{Embedding, Linear, Module, VarBuilder};

use crate::config::ModelConfig;
use crate::error::{CharCountError, Result};
use crate::model::rnn::ElmanRnn;

/// Embedding -> Elman RNN -> linear classifier over the final hidden state.
#[derive(Debug, Clone)]
pub struct CharCountModel {
    embedding: Embedding,
    rnn: ElmanRnn,
    classify: Linear,
    config: ModelConfig,
}

impl CharCountModel {
    /// Build the layers from `vb`. Variables live under `embedding`, `rnn`
    /// and `classify`.
    pub fn new(config: ModelConfig, vb: VarBuilder) -> Result<Self> {
        let embedding =
            candle_nn::embedding(config.vocab_size, config.vector_dim, vb.pp("embedding"))?;
        let rnn = ElmanRnn::new(config.vector_dim, config.vector_dim, vb.pp("rnn"))?;
        let classify = candle_nn::linear(config.vector_dim, config.num_classes, vb.pp("classify"))?;

        Ok(Self {
            embedding,
            rnn,
            classify,
            config,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Raw class scores.
    /// `xs`: [batch_size, sequence_length] u32 -> [batch_size, num_classes] f32
    pub fn logits(&self, xs: &Tensor) -> Result<Tensor> {
        let (_, seq_len) = xs.dims2()?;
        if seq_len != self.config.sequence_length {
            return Err(CharCountError::SequenceLength {
                expected: self.config.sequence_length,
                actual: seq_len,
                input: format!("tensor of shape {:?}", xs.dims()),
            });
        }

        let embedded = self.embedding.forward(xs)?;
        let hidden = self.rnn.forward_final(&embedded)?;
        Ok(self.classify.forward(&hidden)?)
    }

    /// Mean cross-entropy of `logits` against integer `labels` `[batch_size]`.
    pub fn loss(&self, logits: &Tensor, labels: &Tensor) -> Result<Tensor> {
        Ok(candle_nn::loss::cross_entropy(logits, labels)?)
    }

    /// Arg-max class for each row of `xs`.
    pub fn predict(&self, xs: &Tensor) -> Result<Vec<u32>> {
        let logits = self.logits(xs)?;
        Ok(logits.argmax(D::Minus1)?.to_vec1::<u32>()?)
    }
}
