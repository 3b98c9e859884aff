use safeload_core::SafeResult;

use crate::config::FailurePolicy;
use crate::dataset::Dataset;
use crate::safe::SafeDataset;
use crate::sampler::{Sampler, SequentialSampler};

/// Drives a [`SafeDataset`] through a sampler's order, one sample per step.
///
/// Under [`FailurePolicy::Substitute`] every index yields a sample (its own or
/// a fallback); under [`FailurePolicy::Skip`] invalid indices are dropped. An
/// error ends the pass.
pub struct SafeDataLoader<'a, D: Dataset> {
    dataset: &'a mut SafeDataset<D>,
    indices: Vec<usize>,
    policy: FailurePolicy,
    current: usize,
}

impl<'a, D: Dataset> SafeDataLoader<'a, D> {
    /// Visit the dataset in index order with its configured policy.
    pub fn new(dataset: &'a mut SafeDataset<D>) -> Self {
        let sampler = SequentialSampler::new(dataset.len());
        Self::with_sampler(dataset, &sampler)
    }

    pub fn with_sampler<S: Sampler + ?Sized>(dataset: &'a mut SafeDataset<D>, sampler: &S) -> Self {
        let indices = sampler.indices().collect();
        let policy = dataset.config().policy;
        SafeDataLoader {
            dataset,
            indices,
            policy,
            current: 0,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Number of indices in one pass.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Reset the iterator for another pass. The validity cache is kept.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}

impl<'a, D: Dataset> Iterator for SafeDataLoader<'a, D> {
    type Item = SafeResult<D::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&index) = self.indices.get(self.current) {
            self.current += 1;
            let result = match self.policy {
                FailurePolicy::Substitute => self.dataset.get(index).map(Some),
                FailurePolicy::Skip => self.dataset.try_get(index),
            };
            match result {
                Ok(Some(sample)) => return Some(Ok(sample)),
                Ok(None) => continue,
                Err(e) => {
                    self.current = self.indices.len();
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
