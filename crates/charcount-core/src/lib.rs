//! # charcount Core
//!
//! Building blocks for a small recurrent classifier that learns to count how
//! many distinct target characters appear in a short random string: the
//! character vocabulary, seeded synthetic data generation with optional label
//! balancing, and the candle model itself.
//!
//! ## Quick Start
//!
//! ```rust
//! use charcount_core::{DatasetBuilder, SampleGenerator, SeededRng, TargetSet, Vocab};
//!
//! let vocab = Vocab::build();
//! let targets = TargetSet::default();
//! let builder = DatasetBuilder::new(SampleGenerator::new(&targets, &vocab, 6).unwrap());
//!
//! let dataset = builder.build(100, true, &mut SeededRng::new(7));
//! assert_eq!(dataset.len(), 101);
//! assert_eq!(targets.label_of("nakbca"), 3);
//! ```
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod rng;
pub mod vocab;

// Re-export primary API
pub use config::{ModelConfig, TrainingConfig};
pub use data::{Dataset, DatasetBuilder, LabelDistribution, Sample, SampleGenerator, TargetSet};
pub use error::{CharCountError, Result};
pub use model::{CharCountModel, ElmanRnn, TrainableModel};
pub use rng::SeededRng;
pub use vocab::{UNK_TOKEN, Vocab};
