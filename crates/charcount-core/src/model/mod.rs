//! # Classifier Model
//!
//! Embedding + recurrent classifier built on candle, plus the parameter store
//! used for training and persistence.

pub mod classifier;
pub mod init;
pub mod rnn;

use std::path::Path;

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use tracing::debug;

pub use classifier::CharCountModel;
pub use init::init_weights;
pub use rnn::ElmanRnn;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::rng::SeededRng;

/// A model together with the variables backing it.
pub struct TrainableModel {
    varmap: VarMap,
    model: CharCountModel,
}

impl TrainableModel {
    /// Fresh model with weights drawn from `rng`.
    pub fn new(config: ModelConfig, rng: &mut SeededRng, device: &Device) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let model = CharCountModel::new(config, vb)?;
        init_weights(&varmap, rng, config.vector_dim)?;

        debug!(?config, "initialized model parameters");
        Ok(Self { varmap, model })
    }

    /// Rebuild a model from safetensors written by [`save`](Self::save).
    /// Fails if any tensor is missing or has the wrong shape for `config`.
    pub fn load<P: AsRef<Path>>(config: ModelConfig, path: P, device: &Device) -> Result<Self> {
        let mut varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let model = CharCountModel::new(config, vb)?;
        varmap.load(path)?;

        Ok(Self { varmap, model })
    }

    pub fn model(&self) -> &CharCountModel {
        &self.model
    }

    /// Drop the variable map and keep only the model, for inference.
    pub fn into_model(self) -> CharCountModel {
        self.model
    }

    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.varmap.save(path)?;
        Ok(())
    }
}
