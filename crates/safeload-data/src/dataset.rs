use safeload_core::SampleError;

/// Trait for indexed collections of samples.
///
/// `get` may fail for any index; callers that need failures skipped wrap the
/// collection in a [`SafeDataset`](crate::SafeDataset).
pub trait Dataset {
    type Item;

    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn get(&self, idx: usize) -> Result<Self::Item, SampleError>;
}

impl<D: Dataset + ?Sized> Dataset for &D {
    type Item = D::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, idx: usize) -> Result<Self::Item, SampleError> {
        (**self).get(idx)
    }
}

/// An in-memory dataset where some slots may be missing.
///
/// Retrieving a missing slot fails with [`SampleError::Load`].
#[derive(Debug, Clone)]
pub struct VecDataset<T> {
    pub samples: Vec<Option<T>>,
}

impl<T> VecDataset<T> {
    pub fn new(samples: Vec<T>) -> Self {
        VecDataset {
            samples: samples.into_iter().map(Some).collect(),
        }
    }

    pub fn from_options(samples: Vec<Option<T>>) -> Self {
        VecDataset { samples }
    }
}

impl<T: Clone> Dataset for VecDataset<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, idx: usize) -> Result<T, SampleError> {
        match self.samples.get(idx) {
            Some(Some(sample)) => Ok(sample.clone()),
            Some(None) => Err(SampleError::load(idx, "missing sample")),
            None => Err(SampleError::load(idx, "index past end of collection")),
        }
    }
}

/// A dataset that produces samples from a retrieval function.
pub struct FnDataset<F> {
    len: usize,
    load: F,
}

impl<T, F> FnDataset<F>
where
    F: Fn(usize) -> Result<T, SampleError>,
{
    pub fn new(len: usize, load: F) -> Self {
        FnDataset { len, load }
    }
}

impl<T, F> Dataset for FnDataset<F>
where
    F: Fn(usize) -> Result<T, SampleError>,
{
    type Item = T;

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, idx: usize) -> Result<T, SampleError> {
        (self.load)(idx)
    }
}
