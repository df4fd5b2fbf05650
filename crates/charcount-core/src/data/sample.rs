//! Random sample generation.

use crate::data::targets::TargetSet;
use crate::error::Result;
use crate::rng::SeededRng;
use crate::vocab::Vocab;

/// A single encoded sequence and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub input: Vec<u32>,
    pub label: u32,
}

impl Sample {
    pub fn new(input: Vec<u32>, label: u32) -> Self {
        Self { input, label }
    }
}

/// Draws fixed-length sequences of vocabulary tokens and labels them.
#[derive(Debug, Clone)]
pub struct SampleGenerator<'a> {
    targets: &'a TargetSet,
    vocab: &'a Vocab,
    sequence_length: usize,
}

impl<'a> SampleGenerator<'a> {
    /// Fails with `InvalidConfig` when some label could never be produced,
    /// since a balanced build would then wait forever on that bucket.
    pub fn new(targets: &'a TargetSet, vocab: &'a Vocab, sequence_length: usize) -> Result<Self> {
        targets.validate(vocab, sequence_length)?;
        Ok(Self {
            targets,
            vocab,
            sequence_length,
        })
    }

    pub fn targets(&self) -> &TargetSet {
        self.targets
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// Draw `sequence_length` vocabulary keys uniformly with replacement.
    /// Every key is drawable, `unk` included.
    pub fn sample(&self, rng: &mut SeededRng) -> Sample {
        let tokens: Vec<&str> = (0..self.sequence_length)
            .map(|_| self.vocab.tokens()[rng.index(self.vocab.len())].as_str())
            .collect();

        let label = self.targets.label_of_tokens(&tokens);
        Sample::new(self.vocab.encode_lenient(&tokens), label)
    }
}
