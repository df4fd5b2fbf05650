//! Synthetic data: target characters, sample generation and datasets.

pub mod dataset;
pub mod sample;
pub mod targets;

pub use dataset::{Dataset, DatasetBuilder, LabelDistribution};
pub use sample::{Sample, SampleGenerator};
pub use targets::TargetSet;
