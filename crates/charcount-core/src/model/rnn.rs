use candle_core::{Result, Tensor};
use candle_nn::{Linear, Module, VarBuilder};

/// Single-layer Elman RNN with tanh activation.
///
/// `h_t = tanh(W_ih x_t + b_ih + W_hh h_{t-1} + b_hh)`, starting from a zero
/// hidden state.
#[derive(Debug, Clone)]
pub struct ElmanRnn {
    w_ih: Linear,
    w_hh: Linear,
    hidden_dim: usize,
}

impl ElmanRnn {
    pub fn new(input_dim: usize, hidden_dim: usize, vb: VarBuilder) -> Result<Self> {
        let w_ih = candle_nn::linear(input_dim, hidden_dim, vb.pp("w_ih"))?;
        let w_hh = candle_nn::linear(hidden_dim, hidden_dim, vb.pp("w_hh"))?;

        Ok(Self {
            w_ih,
            w_hh,
            hidden_dim,
        })
    }

    /// Run over `xs: [batch, seq_len, input_dim]` and return the final
    /// hidden state `[batch, hidden_dim]`.
    pub fn forward_final(&self, xs: &Tensor) -> Result<Tensor> {
        let (batch, seq_len, _) = xs.dims3()?;
        let mut h = Tensor::zeros((batch, self.hidden_dim), xs.dtype(), xs.device())?;

        for t in 0..seq_len {
            let x_t = xs.narrow(1, t, 1)?.squeeze(1)?.contiguous()?;
            h = (self.w_ih.forward(&x_t)? + self.w_hh.forward(&h)?)?.tanh()?;
        }

        Ok(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn test_final_state_shape_and_range() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let rnn = ElmanRnn::new(5, 7, vb).unwrap();

        let xs = Tensor::ones((3, 4, 5), DType::F32, &Device::Cpu).unwrap();
        let h = rnn.forward_final(&xs).unwrap();
        assert_eq!(h.dims(), &[3, 7]);

        let values = h.flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert!(values.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_empty_sequence_yields_zero_state() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let rnn = ElmanRnn::new(2, 3, vb).unwrap();

        let xs = Tensor::zeros((2, 0, 2), DType::F32, &Device::Cpu).unwrap();
        let h = rnn.forward_final(&xs).unwrap();
        let values = h.flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert!(values.iter().all(|&v| v == 0.0));
    }
}
