use std::collections::HashMap;

use log::{debug, info, warn};
use safeload_core::{SafeError, SafeResult, SampleError, Validity, ValidityCache};

use crate::config::SafeConfig;
use crate::dataset::Dataset;
use crate::transform::TransformChain;

/// Wraps a [`Dataset`] so that samples which fail to load, or which a
/// transform filters out, are replaced by the next valid sample.
///
/// Per-index outcomes are recorded in a [`ValidityCache`] owned by the
/// wrapper, so an index that failed once is never retrieved again until
/// [`SafeDataset::reset`]. A single instance is not meant to be shared
/// across threads; give each worker its own wrapper.
pub struct SafeDataset<D: Dataset> {
    dataset: D,
    transforms: TransformChain<D::Item>,
    config: SafeConfig,
    cache: ValidityCache,
    memo: HashMap<usize, D::Item>,
}

impl<D: Dataset> SafeDataset<D> {
    /// Wrap `dataset` with the default configuration and no transforms.
    pub fn new(dataset: D) -> Self {
        let cache = ValidityCache::new(dataset.len());
        SafeDataset {
            dataset,
            transforms: TransformChain::new(),
            config: SafeConfig::default(),
            cache,
            memo: HashMap::new(),
        }
    }

    pub fn with_config(dataset: D, config: SafeConfig) -> SafeResult<Self> {
        Self::with_transforms(dataset, TransformChain::new(), config)
    }

    /// Wrap `dataset`, running every retrieved sample through `transforms`.
    /// With `config.eager` set the whole collection is scanned here.
    ///
    /// This scan records validity only. When `memoize` is also set, use
    /// [`SafeDataset::with_sample_cache`] to keep the scanned samples in the
    /// same pass; a later `build_sample_cache` would retrieve them again.
    pub fn with_transforms(
        dataset: D,
        transforms: TransformChain<D::Item>,
        config: SafeConfig,
    ) -> SafeResult<Self> {
        let mut safe = Self::unscanned(dataset, transforms, config)?;
        if safe.config.eager {
            safe.build_validity_cache();
        }
        Ok(safe)
    }

    fn unscanned(
        dataset: D,
        transforms: TransformChain<D::Item>,
        config: SafeConfig,
    ) -> SafeResult<Self> {
        config.validate()?;
        let cache = ValidityCache::new(dataset.len());
        Ok(SafeDataset {
            dataset,
            transforms,
            config,
            cache,
            memo: HashMap::new(),
        })
    }

    /// Length of the wrapped collection, including invalid samples.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn into_inner(self) -> D {
        self.dataset
    }

    pub fn config(&self) -> &SafeConfig {
        &self.config
    }

    pub fn cache(&self) -> &ValidityCache {
        &self.cache
    }

    pub fn validity(&self, index: usize) -> Validity {
        self.cache.get(index)
    }

    /// True once every index has been classified.
    pub fn is_index_built(&self) -> bool {
        self.cache.is_complete()
    }

    pub fn num_samples_examined(&self) -> usize {
        self.cache.num_examined()
    }

    pub fn num_valid(&self) -> usize {
        self.cache.num_valid()
    }

    pub fn num_invalid(&self) -> usize {
        self.cache.num_invalid()
    }

    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cache.valid_indices()
    }

    /// Number of valid samples, known only once the index is built.
    pub fn valid_len(&self) -> Option<usize> {
        self.is_index_built().then(|| self.cache.num_valid())
    }

    fn check_bounds(&self, index: usize) -> SafeResult<usize> {
        let len = self.len();
        if index >= len {
            return Err(SafeError::IndexOutOfBounds { index, len });
        }
        Ok(len)
    }

    fn fetch(&self, index: usize) -> Result<Option<D::Item>, SampleError> {
        let sample = self.dataset.get(index)?;
        self.transforms.apply(sample)
    }

    /// One retrieval of `index`, recording the outcome.
    fn attempt(&mut self, index: usize) -> Option<D::Item> {
        let outcome = match self.fetch(index) {
            Ok(Some(sample)) => Some(sample),
            Ok(None) => {
                debug!("sample {} filtered out by transform", index);
                None
            }
            Err(e) => {
                debug!("sample {} failed: {}", index, e);
                None
            }
        };
        if self.config.cache_validity {
            if outcome.is_some() {
                self.cache.mark_valid(index);
            } else {
                self.cache.mark_invalid(index);
            }
        }
        outcome
    }

    fn exhausted(&self, index: usize, len: usize) -> SafeError {
        warn!(
            "no valid sample found from index {} in collection of length {}",
            index, len
        );
        SafeError::Exhausted { index, len }
    }

    /// Sample at `index`, or the first valid sample after it.
    ///
    /// Fallback candidates are `index + 1`, `index + 2`, ... wrapping around
    /// the end. Indices already known invalid are skipped without retrieval,
    /// and no index is tried twice within one call.
    pub fn get(&mut self, index: usize) -> SafeResult<D::Item> {
        let len = self.check_bounds(index)?;
        for offset in 0..len {
            let candidate = (index + offset) % len;
            if self.cache.is_invalid(candidate) {
                continue;
            }
            if let Some(sample) = self.attempt(candidate) {
                if candidate != index {
                    debug!("substituted sample {} for {}", candidate, index);
                }
                return Ok(sample);
            }
        }
        Err(self.exhausted(index, len))
    }

    /// Sample at `index` without fallback; `None` if it is invalid.
    pub fn try_get(&mut self, index: usize) -> SafeResult<Option<D::Item>> {
        self.check_bounds(index)?;
        if self.cache.is_invalid(index) {
            return Ok(None);
        }
        Ok(self.attempt(index))
    }

    /// Classify `index`, retrieving it only if its state is unknown.
    pub fn check(&mut self, index: usize) -> SafeResult<bool> {
        self.check_bounds(index)?;
        Ok(match self.cache.get(index) {
            Validity::Valid => true,
            Validity::Invalid => false,
            Validity::Unknown => self.attempt(index).is_some(),
        })
    }

    /// Try every unresolved index once, recording its validity.
    /// Individual failures are recorded, never raised.
    pub fn build_validity_cache(&mut self) {
        for index in 0..self.len() {
            if !self.cache.get(index).is_resolved() {
                self.attempt(index);
            }
        }
        info!(
            "validity scan complete: {} valid, {} invalid of {}",
            self.cache.num_valid(),
            self.cache.num_invalid(),
            self.len()
        );
    }

    /// Forget all recorded validity and memoized samples.
    pub fn reset(&mut self) {
        self.cache.reset(self.dataset.len());
        self.memo.clear();
    }

    /// Reset, then scan the whole collection again.
    pub fn rebuild(&mut self) {
        self.reset();
        self.build_validity_cache();
    }

    /// The `n`-th valid sample in index order. The index must be built.
    pub fn get_compact(&mut self, n: usize) -> SafeResult<D::Item> {
        if !self.is_index_built() {
            return Err(SafeError::IndexNotBuilt {
                examined: self.num_samples_examined(),
                len: self.len(),
            });
        }
        match self.cache.nth_valid(n) {
            Some(index) => self.get(index),
            None => Err(SafeError::IndexOutOfBounds {
                index: n,
                len: self.cache.num_valid(),
            }),
        }
    }

    /// Iterate over valid samples in index order.
    pub fn iter(&mut self) -> SafeIter<'_, D> {
        SafeIter {
            safe: self,
            next: 0,
        }
    }
}

impl<D: Dataset> SafeDataset<D>
where
    D::Item: Clone,
{
    /// Like [`SafeDataset::with_transforms`], but the eager scan also keeps
    /// every valid sample when `memoize` is set.
    pub fn with_sample_cache(
        dataset: D,
        transforms: TransformChain<D::Item>,
        config: SafeConfig,
    ) -> SafeResult<Self> {
        let mut safe = Self::unscanned(dataset, transforms, config)?;
        if safe.config.eager {
            safe.build_sample_cache();
        }
        Ok(safe)
    }

    /// Like [`SafeDataset::get`], but serves and stores produced samples in
    /// the memo when `memoize` is enabled.
    pub fn get_memoized(&mut self, index: usize) -> SafeResult<D::Item> {
        let len = self.check_bounds(index)?;
        for offset in 0..len {
            let candidate = (index + offset) % len;
            if let Some(sample) = self.memo.get(&candidate) {
                return Ok(sample.clone());
            }
            if self.cache.is_invalid(candidate) {
                continue;
            }
            if let Some(sample) = self.attempt(candidate) {
                if self.config.memoize {
                    self.memo.insert(candidate, sample.clone());
                }
                return Ok(sample);
            }
        }
        Err(self.exhausted(index, len))
    }

    /// Eager scan that also keeps every valid sample when `memoize` is on.
    pub fn build_sample_cache(&mut self) {
        if !self.config.memoize {
            self.build_validity_cache();
            return;
        }
        for index in 0..self.len() {
            if self.memo.contains_key(&index) || self.cache.is_invalid(index) {
                continue;
            }
            if let Some(sample) = self.attempt(index) {
                self.memo.insert(index, sample);
            }
        }
        info!(
            "sample cache built: {} samples retained of {}",
            self.memo.len(),
            self.len()
        );
    }

    pub fn num_memoized(&self) -> usize {
        self.memo.len()
    }
}

/// Iterator over the valid samples of a [`SafeDataset`], in index order.
pub struct SafeIter<'a, D: Dataset> {
    safe: &'a mut SafeDataset<D>,
    next: usize,
}

impl<'a, D: Dataset> Iterator for SafeIter<'a, D> {
    type Item = D::Item;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.safe.len() {
            let index = self.next;
            self.next += 1;
            if let Ok(Some(sample)) = self.safe.try_get(index) {
                return Some(sample);
            }
        }
        None
    }
}
