//! # Dataset Construction
//!
//! Builds collections of generated samples, optionally balancing the label
//! distribution, and exposes them as tensors for batching.

use candle_core::{Device, Tensor};
use tracing::info;

use crate::data::sample::{Sample, SampleGenerator};
use crate::error::Result;
use crate::rng::SeededRng;

/// Ordered collection of samples with a fixed sequence length.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn labels(&self) -> Vec<u32> {
        self.samples.iter().map(|s| s.label).collect()
    }

    /// Inputs `[n, seq_len]` and labels `[n]` for the samples in `start..start + len`,
    /// clamped to the dataset bounds.
    pub fn batch(&self, start: usize, len: usize, device: &Device) -> Result<(Tensor, Tensor)> {
        let end = (start + len).min(self.samples.len());
        let slice = &self.samples[start.min(end)..end];
        let seq_len = slice.first().map(|s| s.input.len()).unwrap_or(0);

        let flat: Vec<u32> = slice.iter().flat_map(|s| s.input.iter().copied()).collect();
        let labels: Vec<u32> = slice.iter().map(|s| s.label).collect();

        let xs = Tensor::from_vec(flat, (slice.len(), seq_len), device)?;
        let ys = Tensor::from_vec(labels, slice.len(), device)?;
        Ok((xs, ys))
    }

    /// The whole dataset as one batch.
    pub fn to_tensors(&self, device: &Device) -> Result<(Tensor, Tensor)> {
        self.batch(0, self.samples.len(), device)
    }

    pub fn distribution(&self, num_classes: usize, requested: usize) -> LabelDistribution {
        let mut dist = LabelDistribution::new(num_classes, requested);
        for sample in &self.samples {
            dist.record(sample.label);
        }
        dist
    }
}

/// Per-label sample counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDistribution {
    counts: Vec<usize>,
    requested: usize,
}

impl LabelDistribution {
    pub fn new(num_classes: usize, requested: usize) -> Self {
        Self {
            counts: vec![0; num_classes],
            requested,
        }
    }

    fn record(&mut self, label: u32) {
        if let Some(c) = self.counts.get_mut(label as usize) {
            *c += 1;
        }
    }

    pub fn count(&self, label: u32) -> usize {
        self.counts.get(label as usize).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Share of `label` relative to the requested sample count, in percent.
    /// Because the builder overshoots by one, shares can sum above 100.
    pub fn percentage(&self, label: u32) -> f64 {
        if self.requested == 0 {
            return 0.0;
        }
        self.count(label) as f64 / self.requested as f64 * 100.0
    }

    pub fn log(&self, name: &str) {
        for label in 0..self.counts.len() as u32 {
            info!(
                dataset = name,
                label,
                count = self.count(label),
                "label-{}: {:.2}%",
                label,
                self.percentage(label)
            );
        }
    }
}

/// Builds datasets from a sample generator.
#[derive(Debug, Clone)]
pub struct DatasetBuilder<'a> {
    generator: SampleGenerator<'a>,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(generator: SampleGenerator<'a>) -> Self {
        Self { generator }
    }

    /// Generate a dataset for a requested size of `n`.
    ///
    /// Accepting continues while the accepted count is `<= n`, so the result
    /// always holds `n + 1` samples. With `balanced`, a sample is discarded
    /// when its label bucket already holds more than `n / num_classes`
    /// samples, so each bucket ends with at most `n / num_classes + 1`.
    pub fn build(&self, n: usize, balanced: bool, rng: &mut SeededRng) -> Dataset {
        let num_classes = self.generator.targets().num_classes();
        let quota = n / num_classes;
        let mut counts = vec![0usize; num_classes];
        let mut samples = Vec::with_capacity(n + 1);

        while samples.len() <= n {
            let sample = self.generator.sample(rng);
            let bucket = sample.label as usize;
            if balanced && counts[bucket] > quota {
                continue;
            }
            counts[bucket] += 1;
            samples.push(sample);
        }

        Dataset::new(samples)
    }

    /// Like [`build`](Self::build), logging the realized label distribution.
    pub fn build_logged(
        &self,
        name: &str,
        n: usize,
        balanced: bool,
        rng: &mut SeededRng,
    ) -> (Dataset, LabelDistribution) {
        let dataset = self.build(n, balanced, rng);
        let dist = dataset.distribution(self.generator.targets().num_classes(), n);
        dist.log(name);
        (dataset, dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::targets::TargetSet;
    use crate::vocab::Vocab;

    fn build(n: usize, balanced: bool, seed: u64) -> Dataset {
        let vocab = Vocab::build();
        let targets = TargetSet::default();
        let builder = DatasetBuilder::new(SampleGenerator::new(&targets, &vocab, 6).unwrap());
        builder.build(n, balanced, &mut SeededRng::new(seed))
    }

    #[test]
    fn test_balanced_counts_within_quota() {
        for seed in [1, 2, 3] {
            let dataset = build(500, true, seed);
            assert_eq!(dataset.len(), 501);

            let dist = dataset.distribution(4, 500);
            assert_eq!(dist.total(), 501);
            for label in 0..4 {
                assert!(dist.count(label) <= 500 / 4 + 1, "label {label}: {:?}", dist);
            }
        }
    }

    #[test]
    fn test_unbalanced_overshoots_by_one() {
        let dataset = build(200, false, 5);
        assert_eq!(dataset.len(), 201);
        assert!(dataset.labels().iter().all(|&l| l <= 3));
    }

    #[test]
    fn test_empty_request() {
        let dataset = build(0, true, 8);
        assert_eq!(dataset.len(), 1);
        let dist = dataset.distribution(4, 0);
        assert_eq!(dist.percentage(dataset.labels()[0]), 0.0);
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let a = build(100, true, 77);
        let b = build(100, true, 77);
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn test_batch_shapes() {
        let dataset = build(40, true, 11);
        let device = Device::Cpu;

        let (xs, ys) = dataset.batch(0, 20, &device).unwrap();
        assert_eq!(xs.dims(), &[20, 6]);
        assert_eq!(ys.dims(), &[20]);

        let (xs, ys) = dataset.batch(30, 20, &device).unwrap();
        assert_eq!(xs.dims(), &[11, 6]);
        assert_eq!(ys.to_vec1::<u32>().unwrap(), dataset.labels()[30..].to_vec());
    }
}
