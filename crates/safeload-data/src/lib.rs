pub mod config;
pub mod dataloader;
pub mod dataset;
pub mod safe;
pub mod sampler;
pub mod transform;

pub use config::{FailurePolicy, SafeConfig};
pub use dataloader::SafeDataLoader;
pub use dataset::{Dataset, FnDataset, VecDataset};
pub use safe::{SafeDataset, SafeIter};
pub use sampler::{IndexSampler, SafeSampler, Sampler, SequentialSampler};
pub use transform::{Transform, TransformChain};
