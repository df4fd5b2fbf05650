//! Deterministic parameter initialization.

use candle_core::Tensor;
use candle_nn::VarMap;

use crate::error::{CharCountError, Result};
use crate::rng::SeededRng;

/// Overwrite every variable in `varmap` from `rng`.
///
/// Embedding tables get N(0, 1); everything else gets U(-k, k) with
/// `k = 1 / sqrt(vector_dim)`. Variables are visited in name order so the
/// result only depends on the seed.
pub fn init_weights(varmap: &VarMap, rng: &mut SeededRng, vector_dim: usize) -> Result<()> {
    let data = varmap
        .data()
        .lock()
        .map_err(|e| CharCountError::Parameters(e.to_string()))?;

    let mut names: Vec<&String> = data.keys().collect();
    names.sort();

    let bound = 1.0 / (vector_dim.max(1) as f32).sqrt();

    for name in names {
        let var = &data[name];
        let n = var.elem_count();
        let values: Vec<f32> = if name.starts_with("embedding") {
            (0..n).map(|_| rng.gauss(0.0, 1.0)).collect()
        } else {
            (0..n).map(|_| rng.uniform_range(-bound, bound)).collect()
        };

        let init = Tensor::from_vec(values, var.dims(), var.device())?.to_dtype(var.dtype())?;
        var.set(&init)?;
    }

    Ok(())
}
