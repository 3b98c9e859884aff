//! # safeload
//!
//! Wrappers that let iteration over an indexed collection survive samples
//! which fail to load or are filtered out by a transform.
//!
//! ## Modules
//!
//! - **core** — `SafeError`/`SampleError` and the per-index `ValidityCache`
//! - **data** — `Dataset` trait, `TransformChain`, `SafeDataset`, `SafeSampler`, `SafeDataLoader`
//!
//! ```
//! use safeload::{SafeDataset, VecDataset};
//!
//! let mut safe = SafeDataset::new(VecDataset::from_options(vec![Some(1), None, Some(3)]));
//! assert_eq!(safe.get(1), Ok(3));
//! ```

/// Error types and validity cache.
pub use safeload_core as core;

/// Datasets, transforms, samplers and loaders.
pub use safeload_data as data;

pub use safeload_core::{SafeError, SafeResult, SampleError, Validity, ValidityCache};
pub use safeload_data::{
    Dataset, FailurePolicy, FnDataset, IndexSampler, SafeConfig, SafeDataLoader, SafeDataset,
    SafeSampler, Sampler, SequentialSampler, Transform, TransformChain, VecDataset,
};
