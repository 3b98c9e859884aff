use thiserror::Error;

/// Failure to produce a single sample.
///
/// These never reach the caller of `SafeDataset::get`; they are caught,
/// logged and recorded in the validity cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("Failed to load sample {index}: {reason}")]
    Load { index: usize, reason: String },

    #[error("Transform failed: {0}")]
    Transform(String),
}

impl SampleError {
    pub fn load(index: usize, reason: impl Into<String>) -> Self {
        SampleError::Load {
            index,
            reason: reason.into(),
        }
    }

    pub fn transform(reason: impl Into<String>) -> Self {
        SampleError::Transform(reason.into())
    }
}

/// Errors surfaced by the safe wrappers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SafeError {
    #[error("No valid sample in collection of length {len} (requested index {index})")]
    Exhausted { index: usize, len: usize },

    #[error("Index out of bounds: index {index} for collection of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Validity index not built: {examined} of {len} samples examined")]
    IndexNotBuilt { examined: usize, len: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type SafeResult<T> = Result<T, SafeError>;
