use thiserror::Error;

/// Errors that can occur while building data, running or persisting the model.
#[derive(Debug, Error)]
pub enum CharCountError {
    /// A character has no entry in the vocabulary (strict encoding only).
    #[error("token {token:?} is not in the vocabulary (input: {input:?})")]
    UnknownToken {
        /// The offending token.
        token: String,
        /// The input it was found in.
        input: String,
    },

    /// An input sequence does not match the model's fixed sequence length.
    #[error("expected a sequence of length {expected}, got {actual} (input: {input:?})")]
    SequenceLength {
        expected: usize,
        actual: usize,
        input: String,
    },

    /// A persisted vocabulary is malformed.
    #[error("invalid vocabulary: {0}")]
    InvalidVocab(String),

    /// Model hyperparameters are inconsistent with the data they are used on.
    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    /// The parameter store could not be accessed.
    #[error("model parameters unavailable: {0}")]
    Parameters(String),

    /// Training produced a NaN or infinite loss.
    #[error("non-finite loss {loss} at epoch {epoch}, batch {batch}")]
    NonFiniteLoss { loss: f32, epoch: usize, batch: usize },

    /// Filesystem error while reading or writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Candle ML framework error.
    #[error("ML framework error: {0}")]
    Candle(#[from] candle_core::Error),
}

/// Result type alias for charcount operations.
pub type Result<T> = std::result::Result<T, CharCountError>;
